//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building regression inputs
#[derive(Debug, Error)]
pub enum TestError {
    /// Grid construction failed
    #[error("grid error: {0}")]
    Core(#[from] floodlab_core::Error),

    /// Generator parameters make no sense
    #[error("invalid generator parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
