//! Error types for NLP operations

use thiserror::Error;

/// Result type for NLP operations
pub type NlpResult<T> = Result<T, NlpError>;

/// Errors that can occur in NLP operations
#[derive(Error, Debug)]
pub enum NlpError {
    #[error("Tensor error: {0}")]
    TensorError(#[from] scratchgpt_core::TensorError),

    #[error("Neural network error: {0}")]
    NnError(#[from] scratchgpt_nn::NnError),

    #[error("Tokenizer error: {0}")]
    TokenizerError(#[from] scratchgpt_tokenizer::TokenizerError),

    #[error("Input of {actual} tokens exceeds the model's context length of {max}")]
    ContextLengthExceeded { max: usize, actual: usize },

    #[error("Input contains no tokens")]
    EmptyInput,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
