//! Error types for SQLBIND

use thiserror::Error;

/// Core error type for SQLBIND operations
#[derive(Error, Debug)]
pub enum SqlBindError {
    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for SQLBIND operations
pub type Result<T> = std::result::Result<T, SqlBindError>;
