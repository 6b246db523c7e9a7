//! Configuration error types.

use std::path::PathBuf;

/// Configuration error.
///
/// `NotFound`, `Io` and `Parse` are load failures. `Validation` means the
/// record was read but is malformed; it always names the offending field.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error in {field}: {message}")]
    Validation {
        /// Config field path (e.g., "`theme.sidebar[2]`").
        field: String,
        /// What is wrong with the field.
        message: String,
    },
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`theme.repo`").
        field: String,
        /// Error message (e.g., "${`BOOK_REPO`} not set").
        message: String,
    },
}

impl ConfigError {
    /// Build a validation error for `field`.
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field the error refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } | Self::EnvVar { field, .. } => Some(field),
            Self::NotFound(_) | Self::Io(_) | Self::Parse(_) => None,
        }
    }

    /// Whether the record was read but failed validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
