//! # ScratchGPT Tokenizer
//!
//! The [`Tokenizer`] contract consumed by the decoding loop, plus a byte-level
//! [`ByteTokenizer`] that needs no vocabulary file.

pub mod api;
mod core;
mod saf;
pub mod spi;

pub use saf::*;
