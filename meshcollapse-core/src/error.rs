//! Error types for meshcollapse

use thiserror::Error;

/// Main error type for meshcollapse operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Topology error: {0}")]
    Topology(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

/// Result type alias for meshcollapse operations
pub type Result<T> = std::result::Result<T, Error>;
