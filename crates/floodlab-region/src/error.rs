//! Error types for floodlab-region

use thiserror::Error;

/// Errors that can occur during labeling and flooding operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error (shape mismatch, bad dimensions)
    #[error("core error: {0}")]
    Core(#[from] floodlab_core::Error),

    /// An explicit level range is too wide for a dense bucket array
    #[error("level range {min}..={max} exceeds {limit} buckets")]
    LevelRangeTooLarge { min: i64, max: i64, limit: usize },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
