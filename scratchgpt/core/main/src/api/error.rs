//! Error types for tensor operations

use thiserror::Error;

/// Result type for tensor operations
pub type TensorResult<T> = Result<T, TensorError>;

/// Errors that can occur in tensor operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    #[error("Shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Index ({row}, {col}) out of bounds for {rows}x{cols} tensor")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Cannot reshape {from:?} into {to:?}: element count differs")]
    InvalidReshape { from: (usize, usize), to: (usize, usize) },

    #[error("Invalid sub-matrix rows {row_start}..{row_end}, cols {col_start}..{col_end} of {rows}x{cols} tensor")]
    InvalidSubMatrix {
        row_start: usize,
        row_end: usize,
        col_start: usize,
        col_end: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Empty tensor")]
    EmptyTensor,
}
