/// Error types for capture and control paths
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
    /// Storage read/write or (de)serialization failed
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A host API call failed, e.g. the tab no longer exists
    #[error("Host error: {0}")]
    Host(String),
}
