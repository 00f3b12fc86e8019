//! # ScratchGPT Neural Network
//!
//! Transformer layers built on [`scratchgpt_core::Tensor`].
//!
//! This crate provides:
//! - Linear projections (`y = xW + b`)
//! - Layer normalization
//! - Multi-head causal self-attention with a precomputed causal mask
//! - GELU feed-forward sublayer and the pre-norm transformer block
//! - Token/position embedding lookup
//! - The [`WeightSource`] contract used to install pretrained parameters
//!
//! ## Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use scratchgpt_core::Tensor;
//! use scratchgpt_nn::TransformerBlock;
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let block = TransformerBlock::new(16, 32, 4, 0.0, &mut rng).unwrap();
//! let x = Tensor::randn(5, 16, &mut rng);
//! let y = block.forward(&x, &mut rng).unwrap();
//! assert_eq!(y.shape(), (5, 16));
//! ```

pub mod api;
mod core;
mod saf;

pub use saf::*;
