//! Errors raised while assembling the proxy configuration.
use std::path::PathBuf;

/// Error messages for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file given on the command line does not exist
    #[error("Configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// Error merging the configuration sources
    #[error("Error loading configuration. Details: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
