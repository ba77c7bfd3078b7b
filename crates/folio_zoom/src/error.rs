use thiserror::Error;

/// Errors surfaced by the viewer.
///
/// Gesture and geometry degeneracies are not errors; they are absorbed as
/// no-ops. Only a failing host or an unusable configuration end up here.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Host operation failed: {0}")]
    Host(String),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
