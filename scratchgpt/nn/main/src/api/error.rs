//! Error types for neural network operations

use scratchgpt_core::TensorError;
use thiserror::Error;

/// Result type for neural network operations
pub type NnResult<T> = Result<T, NnError>;

/// Errors that can occur in neural network operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NnError {
    #[error("Tensor error: {0}")]
    TensorError(#[from] TensorError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Missing weight: {0}")]
    MissingWeight(String),

    #[error("Sequence length {actual} exceeds context length {max}")]
    SequenceTooLong { max: usize, actual: usize },

    #[error("Index {index} out of range for {size} entries")]
    IndexOutOfRange { index: usize, size: usize },
}
