//! Terminal display width of decoded text.
//!
//! Everything here measures text in terminal columns rather than characters:
//! East Asian wide glyphs take two columns and combining marks none.
//!
//! - **Measurement**: [`width_of`], [`char_width`]
//! - **Fitting**: [`width_chop`], [`width_fill`], [`truncate_to_width`]
//! - **Wrapping**: [`wrap`], [`fill`]
//! - **Sanitizing**: [`validate`] for raw bytes, [`process_control_chars`]
//!   for text headed to a terminal
//!
//! # Examples
//!
//! ```
//! use textkit::display::{width_chop, width_of, wrap};
//!
//! assert_eq!(width_of("速い茶色"), 8);
//! assert_eq!(width_chop("速い茶色", 5), (4, "速い"));
//! assert_eq!(wrap("速い 茶色", 4, "", ""), vec!["速い", "茶色"]);
//! ```

mod control;
mod width;
mod wrap;

pub use control::{process_control_chars, ControlStrategy};
pub use width::{char_width, truncate_to_width, validate, width_chop, width_fill, width_of, Fill};
pub use wrap::{fill, wrap, DEFAULT_WRAP_WIDTH};
