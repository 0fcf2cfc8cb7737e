//! Configuration file parser for conversion and display defaults.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
//!
//! Nothing here is process-wide: callers load a `Config` and thread the
//! [`Conversion`] it produces through their own call sites.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::display::DEFAULT_WRAP_WIDTH;
use crate::encoding::{self, Conversion, ErrorPolicy, NonTextPolicy};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// Well-formed TOML naming an encoding the registry doesn't know.
    #[error("Invalid conversion settings: {0}")]
    Encoding(#[from] encoding::Error),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Conversion and display defaults.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Encoding label used for byte ↔ text conversion (e.g. "utf-8", "latin1").
    pub encoding: String,

    /// Policy for undecodable bytes / unencodable characters.
    pub errors: ErrorPolicy,

    /// Policy for values that are neither text nor bytes.
    pub non_text: NonTextPolicy,

    /// Skip the statistical detector when guessing encodings.
    pub disable_heuristic_detector: bool,

    /// Default column width for wrapping.
    pub wrap_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
            errors: ErrorPolicy::Strict,
            non_text: NonTextPolicy::SimpleRepr,
            disable_heuristic_detector: false,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = [
        "encoding",
        "errors",
        "non_text",
        "disable_heuristic_detector",
        "wrap_width",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML or unknown policy name → `Err(ConfigError::Parse)`
    /// - Unknown encoding label → `Err(ConfigError::Encoding)`
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid slurping something huge
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = Self::parse(&content)?;
        tracing::info!(
            path = %path.display(),
            encoding = %config.encoding,
            errors = %config.errors,
            non_text = %config.non_text,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse configuration from TOML text, validating the encoding label.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        encoding::lookup(&config.encoding)?;
        Ok(config)
    }

    /// The conversion options described by this config.
    pub fn conversion(&self) -> Result<Conversion, ConfigError> {
        Ok(Conversion::with_encoding(&self.encoding)?
            .errors(self.errors)
            .non_text(self.non_text))
    }
}

// ============================================================================
// Tests
// ============================================================================
