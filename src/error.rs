//! Crate-level error type for the fallible, non-DOM operations

use thiserror::Error;

/// Errors from config loading, scenario replay and preference storage
#[derive(Debug, Error)]
pub enum FxError {
    /// File could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Config or scenario is not valid JSON for its schema
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Preference store rejected a write
    #[error("storage error: {0}")]
    Storage(String),
    /// Scenario is well-formed JSON but refers to something that does not exist
    #[error("scenario error: {0}")]
    Scenario(String),
}
