//! Error types shared across textcast crates.

use std::path::PathBuf;

/// Top-level error type for textcast operations.
#[derive(Debug, thiserror::Error)]
pub enum TextcastError {
    #[error("Engine error: {message}")]
    Engine { message: String },

    #[error("Engine unavailable: {message}")]
    EngineUnavailable { message: String },

    #[error("Filter error: {message}")]
    Filter { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Editor error: {message}")]
    Model { message: String },

    #[error("Probe error: {message}")]
    Probe { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TextcastError.
pub type TextcastResult<T> = Result<T, TextcastError>;

impl TextcastError {
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine {
            message: msg.into(),
        }
    }

    pub fn engine_unavailable(msg: impl Into<String>) -> Self {
        Self::EngineUnavailable {
            message: msg.into(),
        }
    }

    pub fn filter(msg: impl Into<String>) -> Self {
        Self::Filter {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model {
            message: msg.into(),
        }
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
