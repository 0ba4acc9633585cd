//! Console configuration.
//!
//! Every field has a serde default, so an empty file (or no file at all)
//! yields [`ConsoleConfig::default`].

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConsoleError, Result};

/// Default pause between loop iterations.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 60;

/// Default cap on a single unterminated input line.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// Runtime configuration for a console instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Label rendered in front of the prompt and every log line.
    pub shortname: String,
    /// Sleep between loop iterations, in milliseconds.
    pub tick_interval_ms: u64,
    /// Longest line (in bytes) accepted before the partial input is dropped.
    pub max_line_len: usize,
    /// Stop the loop once the input stream reports end of stream.
    pub terminate_on_eof: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            shortname: String::new(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            terminate_on_eof: true,
        }
    }
}

impl ConsoleConfig {
    /// Config with the given prompt label and defaults for everything else.
    pub fn with_shortname(shortname: impl Into<String>) -> Self {
        Self {
            shortname: shortname.into(),
            ..Self::default()
        }
    }

    /// The loop sleep as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Parse a TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()
    }

    /// Parse a JSON document.
    pub fn from_json(json_str: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()
    }

    /// Load a config file, picking the format from its extension.
    ///
    /// `.json` is parsed as JSON; anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        log::debug!("loading console config from {}", path.display());
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&text),
            _ => Self::from_toml(&text),
        }
    }

    fn validate(self) -> Result<Self> {
        if self.max_line_len == 0 {
            return Err(ConsoleError::Config(
                "max_line_len must be greater than zero".to_string(),
            ));
        }
        if self.shortname.contains(['\n', '\r']) {
            return Err(ConsoleError::Config(
                "shortname must not contain line breaks".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.shortname, "");
        assert_eq!(config.tick_interval_ms, 60);
        assert_eq!(config.tick_interval(), Duration::from_millis(60));
        assert_eq!(config.max_line_len, DEFAULT_MAX_LINE_LEN);
        assert!(config.terminate_on_eof);
    }

    #[test]
    fn with_shortname_keeps_defaults() {
        let config = ConsoleConfig::with_shortname("srv");
        assert_eq!(config.shortname, "srv");
        assert_eq!(config.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
    }

    #[test]
    fn empty_toml_is_default() {
        let config = ConsoleConfig::from_toml("").unwrap();
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = ConsoleConfig::from_toml(
            r#"
shortname = "game"
tick_interval_ms = 10
"#,
        )
        .unwrap();
        assert_eq!(config.shortname, "game");
        assert_eq!(config.tick_interval_ms, 10);
        assert_eq!(config.max_line_len, DEFAULT_MAX_LINE_LEN);
        assert!(config.terminate_on_eof);
    }

    #[test]
    fn json_config() {
        let config =
            ConsoleConfig::from_json(r#"{"shortname": "bot", "terminate_on_eof": false}"#)
                .unwrap();
        assert_eq!(config.shortname, "bot");
        assert!(!config.terminate_on_eof);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = ConsoleConfig::from_toml("tick_interval_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConsoleError::TomlParse(_)));
    }

    #[test]
    fn zero_line_len_rejected() {
        let err = ConsoleConfig::from_toml("max_line_len = 0").unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[test]
    fn multiline_shortname_rejected() {
        let err = ConsoleConfig::from_json(r#"{"shortname": "a\nb"}"#).unwrap_err();
        assert!(format!("{err}").contains("line breaks"));
    }

    #[test]
    fn load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("console.toml");
        let mut f = std::fs::File::create(&toml_path).unwrap();
        writeln!(f, "shortname = \"t\"").unwrap();
        assert_eq!(ConsoleConfig::load(&toml_path).unwrap().shortname, "t");

        let json_path = dir.path().join("console.json");
        std::fs::write(&json_path, r#"{"shortname": "j"}"#).unwrap();
        assert_eq!(ConsoleConfig::load(&json_path).unwrap().shortname, "j");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConsoleConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConsoleError::Io(_)));
    }
}
