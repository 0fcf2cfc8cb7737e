//! Encoding-safe text/byte conversion and terminal display-width utilities.
//!
//! - [`encoding`]: turn arbitrary values into text or bytes under a named
//!   encoding and explicit error policies, and guess unknown encodings
//! - [`display`]: measure, chop, pad and wrap text by terminal columns
//! - [`config`]: TOML-backed defaults for the above

pub mod config;
pub mod display;
pub mod encoding;

pub use config::{Config, ConfigError};
