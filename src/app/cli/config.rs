//! TOML configuration file loading and settings resolution
//!
//! A configuration file is optional. An explicit `--config-file` must exist;
//! otherwise the default location is used when present. Command-line values
//! always override file values.

use crate::core::error_handling::ContextualError;
use crate::core::logging::DebugLevel;
use crate::worker::{ConsumeStrategy, DEFAULT_POLL_INTERVAL};
use serde::Deserialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::args::Args;

const DEFAULT_PRODUCER_INTERVAL: Duration = Duration::from_secs(10);

/// Longest accepted heartbeat period (one week)
pub const MAX_PRODUCER_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

const LOG_FORMATS: [&str; 3] = ["text", "ext", "json"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ConfigError::Read { .. })
    }

    fn user_message(&self) -> Option<String> {
        self.is_user_actionable().then(|| self.to_string())
    }
}

/// Values accepted in `threadtest.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub debug_level: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub producer_interval_secs: Option<u64>,
    pub strategy: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<PathBuf>,
    pub color: Option<bool>,
}

impl FileConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Threadtest").join("threadtest.toml"))
    }

    /// Load the explicit file, or the default one when it exists
    ///
    /// Returns an empty configuration when no file applies.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        log::debug!("Loaded configuration file {}", path.display());
        Self::parse(&path, &contents)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Effective runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub debug_level: DebugLevel,
    /// A `-d` value that matched no level name
    pub unrecognized_level: Option<String>,
    pub strategy: ConsumeStrategy,
    pub producer_interval: Duration,
    pub log_format: Option<String>,
    pub log_file: Option<PathBuf>,
    pub color: bool,
}

impl Settings {
    pub fn resolve(args: &Args, file: &FileConfig) -> Result<Self, ConfigError> {
        let (debug_level, unrecognized_level) =
            match args.debug_level.as_deref().or(file.debug_level.as_deref()) {
                None => (DebugLevel::None, None),
                Some(arg) => match DebugLevel::from_arg(arg) {
                    Some(level) => (level, None),
                    None => (DebugLevel::None, Some(arg.to_string())),
                },
            };

        let interval = match args.poll_interval_ms.or(file.poll_interval_ms) {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: "poll-interval-ms",
                    reason: "must be greater than 0".to_string(),
                })
            }
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_POLL_INTERVAL,
        };

        let strategy = match args.strategy.as_deref().or(file.strategy.as_deref()) {
            Some("poll") => ConsumeStrategy::Poll { interval },
            Some("wait") | None => ConsumeStrategy::Wait { timeout: interval },
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "strategy",
                    reason: format!("'{}' is not one of poll, wait", other),
                })
            }
        };

        let producer_interval = match args.producer_interval_secs.or(file.producer_interval_secs) {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: "producer-interval-secs",
                    reason: "must be greater than 0".to_string(),
                })
            }
            Some(secs) if secs > MAX_PRODUCER_INTERVAL_SECS => {
                return Err(ConfigError::InvalidValue {
                    key: "producer-interval-secs",
                    reason: format!("must not exceed {}", MAX_PRODUCER_INTERVAL_SECS),
                })
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_PRODUCER_INTERVAL,
        };

        let log_format = args.log_format.clone().or_else(|| file.log_format.clone());
        if let Some(format) = log_format.as_deref() {
            if !LOG_FORMATS.contains(&format) {
                return Err(ConfigError::InvalidValue {
                    key: "log-format",
                    reason: format!("'{}' is not one of {}", format, LOG_FORMATS.join(", ")),
                });
            }
        }

        let color = args
            .color_override()
            .or(file.color)
            .unwrap_or_else(|| std::io::stderr().is_terminal());

        Ok(Self {
            debug_level,
            unrecognized_level,
            strategy,
            producer_interval,
            log_format,
            log_file: args.log_file.clone().or_else(|| file.log_file.clone()),
            color,
        })
    }
}
