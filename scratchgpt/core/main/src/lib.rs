//! # ScratchGPT Core
//!
//! Dense two-dimensional `f64` tensor used by every layer of the ScratchGPT
//! transformer. No external linear-algebra backend is involved: matrix
//! products, reductions and activations are plain loops over row-major data.
//!
//! ## Features
//!
//! - Row-major `rows x cols` storage with bounds-checked access
//! - Explicit broadcasting: identical shape, row vector (`1 x cols`) or
//!   column vector (`rows x 1`); anything else is a shape error
//! - Row-wise reductions (`mean`, `variance`)
//! - Numerically stable row-wise softmax, causal masking, dropout and GELU
//!
//! ## Example
//!
//! ```rust
//! use scratchgpt_core::Tensor;
//!
//! let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
//! let b = Tensor::eye(3);
//! let c = a.matmul(&b).unwrap();
//! assert_eq!(c.shape(), (2, 3));
//! ```

pub mod api;
mod core;
mod saf;

pub use saf::*;
