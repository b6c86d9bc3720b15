//! Device configuration
//!
//! Types plus a small no_std parser for the TOML subset used by
//! `device.toml`.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
