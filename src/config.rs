// Configuration file handling and reporter options

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub reporter: ReporterOptions,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Options recognized by the TRX reporter
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ReporterOptions {
    /// Report file path; `[hash]` is replaced with a random hex string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Leave pending tests out of the report
    #[serde(alias = "excludePending")]
    pub exclude_pending: bool,

    /// Warn when pending tests were left out
    #[serde(alias = "warnExcludedPending")]
    pub warn_excluded_pending: bool,

    /// Report pending tests as `NotExecuted` instead of `Pending`
    #[serde(alias = "treatPendingAsNotExecuted")]
    pub treat_pending_as_not_executed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("unknown reporter option `{0}`")]
    UnknownOption(String),

    #[error("invalid boolean `{value}` for reporter option `{key}`")]
    InvalidBool { key: String, value: String },

    #[error("reporter option `{0}` requires a value")]
    MissingValue(String),
}

/// Environment variable used when no `output` option is given
pub const ENV_TRX_REPORTER_FILE: &str = "TRX_REPORTER_FILE";

/// Placeholder replaced with a random hex string in output paths
pub const HASH_PLACEHOLDER: &str = "[hash]";

pub const CONFIG_FILE_NAME: &str = ".trxreporterrc.toml";

impl ReporterOptions {
    /// Apply a mocha-style option string: `output=out.trx,excludePending=true`.
    /// A boolean option given without a value is switched on.
    pub fn apply_reporter_options(&mut self, raw: &str) -> Result<(), OptionsError> {
        for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (pair, None),
            };

            match key {
                "output" => {
                    let value = value
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| OptionsError::MissingValue(key.to_string()))?;
                    self.output = Some(value.to_string());
                }
                "excludePending" | "exclude_pending" => {
                    self.exclude_pending = parse_bool(key, value)?;
                }
                "warnExcludedPending" | "warn_excluded_pending" => {
                    self.warn_excluded_pending = parse_bool(key, value)?;
                }
                "treatPendingAsNotExecuted" | "treat_pending_as_not_executed" => {
                    self.treat_pending_as_not_executed = parse_bool(key, value)?;
                }
                other => return Err(OptionsError::UnknownOption(other.to_string())),
            }
        }
        Ok(())
    }

    /// Parse an option string on top of the defaults
    pub fn parse_reporter_options(raw: &str) -> Result<Self, OptionsError> {
        let mut options = Self::default();
        options.apply_reporter_options(raw)?;
        Ok(options)
    }
}

fn parse_bool(key: &str, value: Option<&str>) -> Result<bool, OptionsError> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        None | Some("") | Some("true") | Some("1") | Some("yes") => Ok(true),
        Some("false") | Some("0") | Some("no") => Ok(false),
        Some(other) => Err(OptionsError::InvalidBool {
            key: key.to_string(),
            value: other.to_string(),
        }),
    }
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .trxreporterrc.toml (current directory)
        // 2. ~/.trxreporterrc.toml (home directory)

        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(CONFIG_FILE_NAME));
        }

        paths
            .iter()
            .find(|path| path.exists())
            .and_then(|path| Self::load_from_file(path))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let config = Self::parse(&content);
        if config.is_none() {
            warn!("Ignoring invalid configuration file {}", path.display());
        }
        config
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}
