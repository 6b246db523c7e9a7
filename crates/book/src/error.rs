//! CLI error types.

use book_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot read {path}: {source}")]
    ReadPage {
        path: String,
        source: std::io::Error,
    },
}
