//! Facade re-exports for scratchgpt-nlp

pub use crate::api::error::*;
pub use crate::api::types::*;
pub use crate::core::generator::{DEFAULT_TOP_N, Generator};
pub use crate::core::gpt::GptModel;
pub use crate::core::sampling::{argmax, sample_top_n, softmax, top_n_indices};
pub use crate::core::weight_map::{Gpt2Weights, TRANSFORMER_PREFIX};
