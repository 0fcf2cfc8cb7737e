use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::path::PathBuf;

use textkit::display::{self, Fill};
use textkit::encoding::{self, Coerced, Conversion, ErrorPolicy, NonTextPolicy, Value};
use textkit::Config;

#[derive(Parser, Debug)]
#[command(name = "textkit", about = "Encoding conversion and terminal width tools")]
struct Args {
    /// TOML file with conversion defaults
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Encoding label (overrides the config file)
    #[arg(long, global = true)]
    encoding: Option<String>,

    /// Error policy: strict, replace, ignore, xmlcharrefreplace, backslashreplace
    #[arg(long, global = true)]
    errors: Option<ErrorPolicy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Guess the encoding of stdin
    Guess {
        /// Only distinguish UTF-8 from the latin1 fallback
        #[arg(long)]
        no_detector: bool,
    },
    /// Decode stdin (guessing the encoding unless --encoding is given) to UTF-8
    Decode,
    /// Encode UTF-8 stdin into --encoding
    Encode,
    /// Print the display width of each input line
    Width,
    /// Chop each input line to a number of columns
    Chop { width: usize },
    /// Pad each input line to a number of columns
    Fill {
        width: usize,
        /// Right-align instead of left-align
        #[arg(long)]
        right: bool,
        /// Chop lines to this many columns first
        #[arg(long)]
        chop: Option<usize>,
        #[arg(long, default_value = "")]
        prefix: String,
        #[arg(long, default_value = "")]
        suffix: String,
    },
    /// Word-wrap stdin by display columns
    Wrap {
        #[arg(long)]
        width: Option<usize>,
        #[arg(long, default_value = "")]
        initial_indent: String,
        #[arg(long, default_value = "")]
        subsequent_indent: String,
    },
    /// Exit non-zero unless stdin is well-formed UTF-8
    Validate,
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read stdin")?;
    Ok(input)
}

fn stdin_text(input: &[u8], conversion: &Conversion) -> Result<String> {
    match encoding::to_text(Value::Bytes(input), conversion)? {
        Coerced::Converted(text) => Ok(text.into_owned()),
        Coerced::Passthru(_) => anyhow::bail!("stdin unexpectedly passed through"),
    }
}

fn check_utf8(input: &[u8]) -> Result<()> {
    if !display::validate(input) {
        tracing::debug!(len = input.len(), "stdin failed UTF-8 validation");
        anyhow::bail!("stdin is not valid UTF-8");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };
    if let Some(label) = &args.encoding {
        config.encoding = label.clone();
    }
    if let Some(errors) = args.errors {
        config.errors = errors;
    }
    // stdin is always bytes, the non-text policy never applies
    config.non_text = NonTextPolicy::Strict;
    let conversion = config.conversion().context("Invalid conversion settings")?;

    let input = read_stdin()?;
    let mut stdout = std::io::stdout().lock();

    match args.command {
        Command::Guess { no_detector } => {
            let label = encoding::guess_encoding(
                &input,
                no_detector || config.disable_heuristic_detector,
            );
            writeln!(stdout, "{label}")?;
        }
        Command::Decode => {
            let text = if args.encoding.is_some() {
                stdin_text(&input, &conversion)?
            } else {
                encoding::guess_decode(&input, config.disable_heuristic_detector)
            };
            stdout.write_all(text.as_bytes())?;
        }
        Command::Encode => {
            let text = std::str::from_utf8(&input).context("stdin is not valid UTF-8")?;
            let bytes = encoding::encode(text, conversion.encoding, conversion.errors)?;
            stdout.write_all(&bytes)?;
        }
        Command::Width => {
            for line in stdin_text(&input, &conversion)?.lines() {
                writeln!(stdout, "{}", display::width_of(line))?;
            }
        }
        Command::Chop { width } => {
            for line in stdin_text(&input, &conversion)?.lines() {
                writeln!(stdout, "{}", display::width_chop(line, width).1)?;
            }
        }
        Command::Fill {
            width,
            right,
            chop,
            prefix,
            suffix,
        } => {
            let fill = Fill {
                left: !right,
                chop,
                prefix: &prefix,
                suffix: &suffix,
            };
            for line in stdin_text(&input, &conversion)?.lines() {
                writeln!(stdout, "{}", display::width_fill(line, width, fill))?;
            }
        }
        Command::Wrap {
            width,
            initial_indent,
            subsequent_indent,
        } => {
            let text = stdin_text(&input, &conversion)?;
            let width = width.unwrap_or(config.wrap_width);
            writeln!(
                stdout,
                "{}",
                display::fill(&text, width, &initial_indent, &subsequent_indent)
            )?;
        }
        Command::Validate => check_utf8(&input)?,
    }

    Ok(())
}
