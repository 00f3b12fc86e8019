//! Facade re-exports for scratchgpt-nn

pub use crate::api::error::*;
pub use crate::api::traits::*;
pub use crate::core::attention::MultiHeadAttention;
pub use crate::core::embedding::Embedding;
pub use crate::core::feed_forward::FeedForward;
pub use crate::core::layer_norm::{DEFAULT_EPS, LayerNorm};
pub use crate::core::linear::Linear;
pub use crate::core::transformer_block::TransformerBlock;
