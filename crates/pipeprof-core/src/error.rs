use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading analyzer configuration.
///
/// Analysis itself never fails; these only surface when a config file is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
