//! Error types for loading documents and configuration
//!
//! Declaration defects are never reported through this type; they are
//! collected as [`ModelErrors`](crate::diagnostics::ModelErrors).

use std::path::PathBuf;

use thiserror::Error;

/// Result type for schemabook operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised outside of declaration validation
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("invalid type reference: '{0}'")]
    InvalidTypeReference(String),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
