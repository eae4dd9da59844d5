use std::path::PathBuf;

use thiserror::Error;
use tokio::task::JoinError;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported language: {requested} (choose one of: {supported})")]
    UnsupportedLanguage { requested: String, supported: String },
    #[error("Transport error fetching {url}: {reason}")]
    Transport {
        url: String,
        status: Option<u16>,
        reason: String,
    },
    #[error("Malformed index: {0}")]
    MalformedIndex(String),
    #[error("Cache record not found at {}", .0.display())]
    CacheMissing(PathBuf),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    Join(#[from] JoinError),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl AppError {
    /// HTTP status carried by a transport failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}
