//! Lookup-service configuration from environment variables.
//!
//! Variables carry the `REGISTRY_` prefix:
//!
//! - `REGISTRY_LANGUAGE_CODES`: comma-separated allowed language codes
//! - `REGISTRY_ENUM_TABLE`: path of a JSON enum table
//!   (`{ "<domain>": { "<value>": "<wire>" } }`)
//!
//! # Example
//!
//! ```ignore
//! use registry_validate::config::{load_dotenv, ValidatorConfig};
//! use registry_validate::Services;
//!
//! load_dotenv();
//! let config = ValidatorConfig::from_env()?;
//! let services = Services::from_config(&config)?;
//! ```

use crate::context::{EnumTable, LanguageCodeSet, Services, DEFAULT_LANGUAGE_CODES};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Prefix of every configuration variable.
pub const ENV_PREFIX: &str = "REGISTRY_";

/// Error type for configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),

    /// The enum table file could not be read.
    #[error("Cannot read enum table '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The enum table file is not valid JSON of the expected shape.
    #[error("Malformed enum table '{}': {source}", path.display())]
    EnumTable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn default_language_codes() -> Vec<String> {
    DEFAULT_LANGUAGE_CODES.iter().map(|c| c.to_string()).collect()
}

/// Lookup-service settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidatorConfig {
    /// Allowed language codes
    #[serde(default = "default_language_codes")]
    pub language_codes: Vec<String>,
    /// Optional enum table file
    #[serde(default)]
    pub enum_table: Option<PathBuf>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            language_codes: default_language_codes(),
            enum_table: None,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from `REGISTRY_`-prefixed environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        envy::prefixed(ENV_PREFIX)
            .from_env::<Self>()
            .map_err(ConfigError::from)
    }

    /// Load configuration from explicit key/value pairs, as if they were
    /// environment variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Self>(vars)
            .map_err(ConfigError::from)
    }

    /// Like [`from_env`](Self::from_env), falling back to defaults when the
    /// environment is malformed.
    pub fn from_env_or_default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "invalid validator configuration, using defaults");
            Self::default()
        })
    }
}

impl Services {
    /// Build lookup services from configuration.
    ///
    /// Without an enum table file every enum domain is unknown.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, ConfigError> {
        let languages = LanguageCodeSet::new(config.language_codes.iter().map(|c| c.trim()));

        let enums = match &config.enum_table {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_str::<EnumTable>(&json).map_err(|source| {
                    ConfigError::EnumTable {
                        path: path.clone(),
                        source,
                    }
                })?
            }
            None => EnumTable::new(),
        };

        tracing::debug!(
            languages = config.language_codes.len(),
            enum_table = ?config.enum_table,
            "lookup services configured"
        );

        Ok(Services::builder().languages(languages).enums(enums).build())
    }
}

/// Load environment variables from a `.env` file, if present.
///
/// Existing environment variables take precedence.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Load environment variables from a specific file path, if present.
pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
    let _ = dotenvy::from_path(path);
}
