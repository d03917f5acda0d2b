//! Error types for slidepoint.
//!
//! The segmentation, planning and rendering passes never fail; errors only
//! come from loading configuration and documents.

use thiserror::Error;

/// Result type for slidepoint operations
pub type Result<T> = std::result::Result<T, SlidepointError>;

/// Errors that can occur while loading engine inputs
#[derive(Error, Debug)]
pub enum SlidepointError {
    /// Configuration file not found or inaccessible
    #[error("Config not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration values out of range
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Document is not a valid content tree
    #[error("Invalid document: {reason}")]
    InvalidDocument { reason: String },

    /// An abbreviation could not be turned into a pattern
    #[error("Invalid abbreviation pattern: {0}")]
    PatternError(#[from] regex::Error),

    /// JSON parsing error (content trees)
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error (configuration)
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SlidepointError {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create an invalid document error
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            reason: reason.into(),
        }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => "SP001",
            Self::InvalidConfig { .. } => "SP002",
            Self::InvalidDocument { .. } => "SP003",
            Self::PatternError(_) => "SP004",
            Self::JsonError(_) => "SP005",
            Self::TomlError(_) => "SP006",
            Self::IoError(_) => "SP007",
        }
    }
}
