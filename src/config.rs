use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Sizing of the keyed store backing join metadata, with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JoinMetadataConfig {
    /// Page size hint for the key store, in bytes
    #[validate(range(
        min = 64,
        max = 16777216,
        message = "Page size must be between 64 bytes and 16 MiB"
    ))]
    pub page_size: usize,

    /// Fraction of key slots that may be filled before the store grows
    #[validate(range(
        min = 0.1,
        max = 0.95,
        message = "Load factor must be between 0.1 and 0.95"
    ))]
    pub load_factor: f64,

    /// How many times the store may double its key capacity
    pub max_resizes: u32,
}

impl Default for JoinMetadataConfig {
    fn default() -> Self {
        Self {
            page_size: 4096,
            load_factor: 0.6,
            max_resizes: u32::MAX,
        }
    }
}

impl JoinMetadataConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            page_size: parse_env_var("JOINMETA_PAGE_SIZE", "4096")?,
            load_factor: parse_env_var("JOINMETA_LOAD_FACTOR", "0.6")?,
            max_resizes: parse_env_var("JOINMETA_MAX_RESIZES", &u32::MAX.to_string())?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Key capacity to request for `column_count` joined columns.
    ///
    /// Each column owns a qualified and an unqualified key.
    pub fn key_capacity(column_count: usize) -> usize {
        column_count.saturating_mul(2)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = match env::var(key) {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => default.to_string(),
        Err(e) => return Err(e.into()),
    };
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
