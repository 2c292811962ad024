//! Error types for the data room.

use thiserror::Error;

/// Common error type for data room operations.
#[derive(Error, Debug)]
pub enum DataRoomError {
    /// A referenced folder or file does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Folder deletion blocked by existing sub-folders.
    #[error("folder not empty: {0}")]
    NotEmpty(String),

    /// Missing or malformed input, such as an upload without content.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O error from the artifact storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for data room operations.
pub type Result<T> = std::result::Result<T, DataRoomError>;
