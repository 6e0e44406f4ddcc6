//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{RadiotrailError, Result};
use crate::history::ring::DEFAULT_HISTORY_DEPTH;
use crate::wire::address::Address;
use crate::wire::decoder::{TruncationPolicy, WireDecoder};
use crate::wire::protocol::{ProtocolVersion, EXTENDED_RECORD_SIZE};

/// Largest accepted history depth
pub const MAX_HISTORY_DEPTH: usize = 1024;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub wire: WireConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// History ring configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "default_depth")]
    pub depth: usize,
}

/// Wire format configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WireConfig {
    #[serde(default = "default_record_size")]
    pub record_size: usize,

    #[serde(default)]
    pub truncation: TruncationPolicy,

    #[serde(default)]
    pub reject_empty: bool,
}

/// Frame replay configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayConfig {
    #[serde(default = "default_replay_dir")]
    pub dir: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_redraw_interval_ms")]
    pub redraw_interval_ms: u64,

    #[serde(default)]
    pub loop_frames: bool,
}

/// Report output configuration
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_format")]
    pub format: OutputFormat,

    /// Entities to build trails for; empty means every entity in the head
    #[serde(default)]
    pub trail_for: Vec<Address>,
}

/// Report rendering
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily rolling log files; empty logs to stderr only
    #[serde(default)]
    pub log_dir: String,
}

// Default value functions
fn default_depth() -> usize { DEFAULT_HISTORY_DEPTH }

fn default_record_size() -> usize { EXTENDED_RECORD_SIZE }

fn default_replay_dir() -> String { "./frames".to_string() }
fn default_poll_interval_ms() -> u64 { 4000 }
fn default_redraw_interval_ms() -> u64 { 1000 }

fn default_output_format() -> OutputFormat { OutputFormat::Text }

fn default_log_level() -> String { "info".to_string() }

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { depth: default_depth() }
    }
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            record_size: default_record_size(),
            truncation: TruncationPolicy::default(),
            reject_empty: false,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            dir: default_replay_dir(),
            poll_interval_ms: default_poll_interval_ms(),
            redraw_interval_ms: default_redraw_interval_ms(),
            loop_frames: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            trail_for: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

impl WireConfig {
    /// Protocol version matching `record_size`
    ///
    /// Only meaningful after validation; falls back to the default version.
    pub fn protocol_version(&self) -> ProtocolVersion {
        ProtocolVersion::from_record_size(self.record_size).unwrap_or_default()
    }

    /// Decoder built from this configuration
    pub fn decoder(&self) -> WireDecoder {
        WireDecoder::new(self.protocol_version())
            .with_truncation(self.truncation)
            .with_reject_empty(self.reject_empty)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use radiotrail::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.history.depth == 0 || self.history.depth > MAX_HISTORY_DEPTH {
            return Err(invalid(format!(
                "history depth must be between 1 and {}",
                MAX_HISTORY_DEPTH
            )));
        }

        if ProtocolVersion::from_record_size(self.wire.record_size).is_none() {
            return Err(invalid("record_size must be 19 or 20"));
        }

        if self.replay.dir.is_empty() {
            return Err(invalid("replay dir cannot be empty"));
        }

        if self.replay.poll_interval_ms == 0 || self.replay.poll_interval_ms > 60000 {
            return Err(invalid("poll_interval_ms must be between 1 and 60000"));
        }

        if self.replay.redraw_interval_ms == 0 || self.replay.redraw_interval_ms > 60000 {
            return Err(invalid("redraw_interval_ms must be between 1 and 60000"));
        }

        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(invalid("log level must be one of: trace, debug, info, warn, error"));
        }

        Ok(())
    }
}

fn invalid(message: impl std::fmt::Display) -> RadiotrailError {
    RadiotrailError::Config(toml::de::Error::custom(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.wire.protocol_version(), ProtocolVersion::WithScannerCount);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.history.depth, 3);
        assert_eq!(config.wire.record_size, 20);
        assert_eq!(config.wire.truncation, TruncationPolicy::Reject);
        assert!(!config.wire.reject_empty);
        assert_eq!(config.replay.poll_interval_ms, 4000);
        assert_eq!(config.replay.redraw_interval_ms, 1000);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.output.trail_for.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[history]
depth = 8

[wire]
record_size = 19
truncation = "drop_trailing"
reject_empty = true

[replay]
dir = "/tmp/frames"
loop_frames = true

[output]
format = "json"
trail_for = ["01:23:45:67:89:AB"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.history.depth, 8);
        assert_eq!(config.wire.protocol_version(), ProtocolVersion::Compact);
        assert_eq!(config.wire.truncation, TruncationPolicy::DropTrailing);
        assert!(config.replay.loop_frames);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(
            config.output.trail_for,
            vec![Address::new([0x01, 0x23, 0x45, 0x67, 0x89, 0xAB])]
        );

        let decoder = config.wire.decoder();
        assert_eq!(decoder.version(), ProtocolVersion::Compact);
        assert_eq!(decoder.truncation(), TruncationPolicy::DropTrailing);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/radiotrail.toml");
        assert!(matches!(result, Err(RadiotrailError::Io(_))));
    }

    #[test]
    fn test_bad_trail_address() {
        let result = Config::from_toml("[output]\ntrail_for = [\"01:23\"]\n");
        assert!(matches!(result, Err(RadiotrailError::Config(_))));
    }

    #[test]
    fn test_unknown_truncation_policy() {
        let result = Config::from_toml("[wire]\ntruncation = \"guess\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_depth_zero() {
        let mut config = Config::default();
        config.history.depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_depth_too_high() {
        let mut config = Config::default();
        config.history.depth = MAX_HISTORY_DEPTH + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_record_size() {
        let mut config = Config::default();
        config.wire.record_size = 18;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_record_sizes() {
        for &size in &[19, 20] {
            let mut config = Config::default();
            config.wire.record_size = size;
            assert!(config.validate().is_ok(), "Record size {} should be valid", size);
        }
    }

    #[test]
    fn test_empty_replay_dir() {
        let mut config = Config::default();
        config.replay.dir = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_zero() {
        let mut config = Config::default();
        config.replay.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redraw_interval_too_high() {
        let mut config = Config::default();
        config.replay.redraw_interval_ms = 60001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_depth(), 3);
        assert_eq!(default_record_size(), 20);
        assert_eq!(default_replay_dir(), "./frames");
        assert_eq!(default_poll_interval_ms(), 4000);
        assert_eq!(default_redraw_interval_ms(), 1000);
        assert_eq!(default_output_format(), OutputFormat::Text);
        assert_eq!(default_log_level(), "info");
    }
}
