//! # ScratchGPT NLP
//!
//! GPT-2 style text generation on top of `scratchgpt-nn`.
//!
//! This crate provides:
//! - [`GptConfig`], loadable from a Hugging Face style `config.json`
//! - [`GptModel`], the token-id to logits forward entry point
//! - Top-N truncated sampling and the autoregressive [`Generator`]
//! - [`GenerationRequest`] parsing with a fixed fallback token count
//!
//! ## Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use scratchgpt_nlp::{Generator, GptConfig, GptModel};
//! use scratchgpt_tokenizer::ByteTokenizer;
//!
//! let config = GptConfig {
//!     vocab_size: 256,
//!     n_positions: 32,
//!     n_embd: 16,
//!     n_layer: 1,
//!     n_head: 2,
//!     dropout: 0.0,
//!     layer_norm_eps: 1e-5,
//! };
//! let mut rng = StdRng::seed_from_u64(42);
//! let model = GptModel::new(config, &mut rng).unwrap();
//! let text = Generator::new(&model)
//!     .generate(&ByteTokenizer, "hi", 3, &mut rng, |_partial| {})
//!     .unwrap();
//! assert!(text.len() >= 2);
//! ```

pub mod api;
mod core;
mod saf;

pub use saf::*;
