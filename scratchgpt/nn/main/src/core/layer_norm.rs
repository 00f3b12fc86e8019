//! Layer normalization over the feature axis.

use crate::api::error::{NnError, NnResult};
use crate::api::traits::{WeightSource, param_name};
use crate::core::linear::as_row_vector;
use scratchgpt_core::{ROW_AXIS, Tensor};

/// Default epsilon added to the variance before the square root.
pub const DEFAULT_EPS: f64 = 1e-5;

/// Layer Normalization.
///
/// Each row is shifted to zero mean and scaled by `1 / sqrt(var + eps)`, where
/// `var` is the biased (divide by `d`) row variance. A learned per-feature
/// scale and shift is applied afterwards: `output = weight * normalized + bias`.
#[derive(Debug, Clone)]
pub struct LayerNorm {
    /// Scale `[1, d]`
    weight: Tensor,
    /// Shift `[1, d]`
    bias: Tensor,
    eps: f64,
}

impl LayerNorm {
    /// Creates a LayerNorm with unit scale, zero shift and `eps = 1e-5`.
    pub fn new(dim: usize) -> Self {
        Self::with_eps(dim, DEFAULT_EPS)
    }

    pub fn with_eps(dim: usize, eps: f64) -> Self {
        Self {
            weight: Tensor::ones(1, dim),
            bias: Tensor::zeros(1, dim),
            eps,
        }
    }

    /// Creates a LayerNorm from existing scale and shift vectors.
    pub fn from_weights(weight: Tensor, bias: Tensor, eps: f64) -> NnResult<Self> {
        let dim = weight.numel();
        let weight = as_row_vector(weight, dim, "LayerNorm weight")?;
        let bias = as_row_vector(bias, dim, "LayerNorm bias")?;
        Ok(Self { weight, bias, eps })
    }

    /// Build from `{prefix}.weight` and `{prefix}.bias`.
    pub fn load<S: WeightSource + ?Sized>(source: &S, prefix: &str, eps: f64) -> NnResult<Self> {
        let weight = source.require(&param_name(prefix, "weight"))?.clone();
        let bias = source.require(&param_name(prefix, "bias"))?.clone();
        Self::from_weights(weight, bias, eps)
    }

    /// Replace scale and shift; both must match the current feature width.
    pub fn set_params(&mut self, weight: Tensor, bias: Tensor) -> NnResult<()> {
        let dim = self.dim();
        let weight = as_row_vector(weight, dim, "LayerNorm weight")?;
        let bias = as_row_vector(bias, dim, "LayerNorm bias")?;
        self.weight.set_data(&weight)?;
        self.bias.set_data(&bias)?;
        Ok(())
    }

    pub fn dim(&self) -> usize {
        self.weight.cols()
    }

    /// Returns the epsilon value used for numerical stability.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn parameter_count(&self) -> usize {
        self.weight.numel() + self.bias.numel()
    }

    /// Normalized rows before the affine scale and shift.
    pub fn normalize(&self, x: &Tensor) -> NnResult<Tensor> {
        if x.cols() != self.dim() {
            return Err(NnError::ShapeMismatch(format!(
                "LayerNorm expects {} features, got {}",
                self.dim(),
                x.cols()
            )));
        }
        let mean = x.mean(ROW_AXIS)?;
        let std = x.variance(ROW_AXIS, false)?.add_scalar(self.eps).sqrt();
        Ok(x.sub(&mean)?.div(&std)?)
    }

    pub fn forward(&self, x: &Tensor) -> NnResult<Tensor> {
        Ok(self.normalize(x)?.mul(&self.weight)?.add(&self.bias)?)
    }
}
