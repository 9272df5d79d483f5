//! Error types for the plugin reloader.

use thiserror::Error;

use crate::host::HostError;

/// Result type alias for reloader operations
pub type Result<T> = std::result::Result<T, ReloaderError>;

/// Main error type for the plugin reloader
#[derive(Error, Debug)]
pub enum ReloaderError {
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}
