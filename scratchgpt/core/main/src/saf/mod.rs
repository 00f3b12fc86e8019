//! Facade re-exports for scratchgpt-core

pub use crate::api::error::*;
pub use crate::api::types::*;
pub use crate::core::functional;
pub use crate::core::tensor::Tensor;
