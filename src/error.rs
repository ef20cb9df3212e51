//! Error types for picost
//!
//! There are two error types: `PicostError` (main error enum) and `ConfigError`
//! (configuration-specific).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `PicostError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling. The conversion
//! happens at the CLI boundary using `anyhow::Error::from` to preserve error chains.
//!
//! Building cost lines never fails. An unknown processor mode, system family or
//! storage tier becomes an empty unit code and a missing usage estimate becomes
//! an absent quantity. Errors only come from the collaborators around the
//! builder: reading plan and usage files, parsing them, and validating input.
//!
//! ## When to Use Which Error
//!
//! - `ConfigError`: Configuration parsing and validation issues
//!   - Automatically converted to `PicostError::Config` via `#[from]`
//!
//! - `Plan`: A plan file could not be parsed into resource definitions
//!
//! - `Usage`: A usage file entry could not be interpreted as a number
//!
//! - `Validation`: Input validation failures (empty region, malformed address,
//!   negative capacities or estimates)

use thiserror::Error;

/// Main error type for picost
#[derive(Error, Debug)]
pub enum PicostError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Plan error: {path} - {message}")]
    Plan { path: String, message: String },

    #[error("Usage error: {address}.{key} - {reason}")]
    Usage {
        address: String,
        key: String,
        reason: String,
    },

    #[error("Unsupported resource type: {0}")]
    UnsupportedResource(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PicostError>;
