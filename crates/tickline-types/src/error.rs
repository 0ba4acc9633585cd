//! Error types for tickline.

use std::io;

/// Errors produced by the console and its configuration layer.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("config error: {0}")]
    Config(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ConsoleError>;
