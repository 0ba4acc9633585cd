//! Foundation types for tickline.
//!
//! Shared by the console core and the binary: the error enum with its
//! `Result` alias, and the console configuration loaded from TOML or JSON.

pub mod config;
pub mod error;

pub use config::ConsoleConfig;
pub use error::{ConsoleError, Result};
