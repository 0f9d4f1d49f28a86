//! tokenz error types

use std::path::PathBuf;

/// tokenz error types
#[derive(Debug, thiserror::Error)]
pub enum TokenzError {
    // Tokenizer errors
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    #[error("invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    // Document I/O errors
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Background task errors
    /// A newer request superseded this one before it finished.
    #[error("tokenization cancelled")]
    Cancelled,

    #[error("background task failed: {0}")]
    TaskFailed(String),
}

impl TokenzError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TokenzError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for tokenz operations
pub type Result<T> = std::result::Result<T, TokenzError>;
