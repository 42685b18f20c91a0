//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BALLOT_MIN_AGE=21                                                  │
//! │     BALLOT_REQUIRED_FIELDS=id,name,age                                 │
//! │     BALLOT_LOG_LEVEL=debug                                             │
//! │     BALLOT_LOG_FORMAT=json                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or ./ballot.toml when present                     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     min_age 18, no required fields, info level, human output           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [validator]
//! min_age = 18
//! required_fields = ["id", "age"]
//!
//! [logging]
//! level = "info"     # any EnvFilter directive
//! format = "human"   # human | json
//!
//! [output]
//! pretty = true
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ballot_core::ValidatorRules;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "ballot.toml";

// =============================================================================
// Log Format
// =============================================================================

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines for terminals.
    #[default]
    Human,
    /// Newline-delimited JSON.
    Json,
}

impl FromStr for LogFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "pretty" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            _ => Err(CliError::InvalidValue {
                key: "log format".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print the JSON report.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { pretty: true }
    }
}

// =============================================================================
// Ballot Config
// =============================================================================

/// Merged CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BallotConfig {
    /// Rules applied to every voter before registration.
    #[serde(default)]
    pub validator: ValidatorRules,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl BallotConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        info!(?path, "Loading ballot config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if !self.validator.min_age.is_finite() || self.validator.min_age < 0.0 {
            return Err(CliError::InvalidConfig(format!(
                "min_age must be a non-negative number, got {}",
                self.validator.min_age
            )));
        }

        if self
            .validator
            .required_fields
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(CliError::InvalidConfig(
                "required_fields must not contain empty names".into(),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(CliError::InvalidConfig("logging level must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `BALLOT_*` environment variable overrides.
    fn apply_env_overrides(&mut self) -> CliResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key → value source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("BALLOT_MIN_AGE") {
            let min_age = raw.trim().parse::<f64>().map_err(|_| CliError::InvalidValue {
                key: "BALLOT_MIN_AGE".to_string(),
                value: raw.clone(),
            })?;
            debug!(min_age, "Overriding minimum age from environment");
            self.validator.min_age = min_age;
        }

        if let Some(raw) = lookup("BALLOT_REQUIRED_FIELDS") {
            self.validator.required_fields = raw
                .split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(level) = lookup("BALLOT_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(raw) = lookup("BALLOT_LOG_FORMAT") {
            match raw.parse() {
                Ok(format) => self.logging.format = format,
                Err(_) => warn!(format = %raw, "Unknown log format in environment"),
            }
        }

        Ok(())
    }
}
