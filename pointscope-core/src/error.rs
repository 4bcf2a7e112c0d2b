//! Error types for pointscope

use thiserror::Error;

/// Main error type for pointscope operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("Sample index {0} out of range")]
    SampleIndex(usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for pointscope operations
pub type Result<T> = std::result::Result<T, Error>;
