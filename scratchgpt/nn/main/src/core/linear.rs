//! Affine projection `y = xW + b`.

use crate::api::error::{NnError, NnResult};
use crate::api::traits::{WeightSource, param_name};
use rand::Rng;
use scratchgpt_core::Tensor;

/// Accept a `1 x len` or `len x 1` parameter vector and return it as `1 x len`.
pub(crate) fn as_row_vector(t: Tensor, len: usize, what: &str) -> NnResult<Tensor> {
    match t.shape() {
        (1, n) if n == len => Ok(t),
        (n, 1) if n == len => Ok(t.reshape(1, n)?),
        shape => Err(NnError::ShapeMismatch(format!(
            "{} shape {:?} doesn't match length {}",
            what, shape, len
        ))),
    }
}

/// A fully connected linear layer: `y = xW + b`.
///
/// The weight is stored `in_features x out_features`, the layout GPT-2
/// checkpoints use, so loaded matrices are installed without transposing.
#[derive(Debug, Clone)]
pub struct Linear {
    /// Weight matrix `[in_features, out_features]`
    pub(crate) weight: Tensor,
    /// Bias row vector `[1, out_features]`
    pub(crate) bias: Tensor,
    pub in_features: usize,
    pub out_features: usize,
}

impl Linear {
    /// Create a new linear layer with Xavier-scaled normal weights and a zero bias.
    pub fn new<R: Rng + ?Sized>(in_features: usize, out_features: usize, rng: &mut R) -> Self {
        let scale = (2.0 / (in_features + out_features).max(1) as f64).sqrt();
        let weight = Tensor::random_normal(in_features, out_features, 0.0, scale, rng);
        Self {
            weight,
            bias: Tensor::zeros(1, out_features),
            in_features,
            out_features,
        }
    }

    /// Create a linear layer whose parameters are all zero.
    pub fn zeros(in_features: usize, out_features: usize) -> Self {
        Self {
            weight: Tensor::zeros(in_features, out_features),
            bias: Tensor::zeros(1, out_features),
            in_features,
            out_features,
        }
    }

    /// Create a linear layer from existing weights.
    pub fn from_weights(weight: Tensor, bias: Tensor) -> NnResult<Self> {
        let (in_features, out_features) = weight.shape();
        let bias = as_row_vector(bias, out_features, "Bias")?;
        Ok(Self {
            weight,
            bias,
            in_features,
            out_features,
        })
    }

    /// Build from `{prefix}.weight` and `{prefix}.bias`.
    pub fn load<S: WeightSource + ?Sized>(source: &S, prefix: &str) -> NnResult<Self> {
        let weight = source.require(&param_name(prefix, "weight"))?.clone();
        let bias = source.require(&param_name(prefix, "bias"))?.clone();
        Self::from_weights(weight, bias)
    }

    /// Replace the weight matrix. The new matrix must have the current shape.
    pub fn set_weights(&mut self, weight: Tensor) -> NnResult<()> {
        if weight.shape() != self.weight.shape() {
            return Err(NnError::ShapeMismatch(format!(
                "Weight shape {:?} doesn't match {:?}",
                weight.shape(),
                self.weight.shape()
            )));
        }
        self.weight.set_data(&weight)?;
        Ok(())
    }

    /// Replace the bias, given as `1 x out` or `out x 1`.
    pub fn set_bias(&mut self, bias: Tensor) -> NnResult<()> {
        let bias = as_row_vector(bias, self.out_features, "Bias")?;
        self.bias.set_data(&bias)?;
        Ok(())
    }

    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    pub fn bias(&self) -> &Tensor {
        &self.bias
    }

    pub fn parameter_count(&self) -> usize {
        self.weight.numel() + self.bias.numel()
    }

    /// Forward pass: `x.matmul(W) + b`, bias broadcast over rows.
    ///
    /// Input shape: `[seq, in_features]`, output shape: `[seq, out_features]`.
    pub fn forward(&self, x: &Tensor) -> NnResult<Tensor> {
        Ok(x.matmul(&self.weight)?.add(&self.bias)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    #[test]
    fn test_forward_shape_and_value() {
        let w = Tensor::from_vec(vec![1.0, 0.0, 2.0, 0.0, 1.0, 3.0], 2, 3).unwrap();
        let b = Tensor::row_vector(&[0.5, -0.5, 1.0]);
        let layer = Linear::from_weights(w, b).unwrap();
        let x = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let y = layer.forward(&x).unwrap();
        assert_eq!(y.shape(), (2, 3));
        assert_eq!(y.data(), &[1.5, 1.5, 9.0, 3.5, 3.5, 19.0]);
    }

    #[test]
    fn test_set_weights_checks_shape() {
        let mut layer = Linear::zeros(4, 2);
        assert!(layer.set_weights(Tensor::ones(2, 4)).is_err());
        layer.set_weights(Tensor::ones(4, 2)).unwrap();
        assert_eq!(layer.weight().sum_all(), 8.0);
    }

    #[test]
    fn test_set_bias_accepts_column_vector() {
        let mut layer = Linear::zeros(2, 3);
        layer.set_bias(Tensor::column_vector(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(layer.bias().shape(), (1, 3));
        assert!(layer.set_bias(Tensor::row_vector(&[1.0, 2.0])).is_err());
        let y = layer.forward(&Tensor::ones(2, 2)).unwrap();
        assert_eq!(y.data(), &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_forward_rejects_wrong_input_width() {
        let layer = Linear::zeros(3, 2);
        assert!(matches!(
            layer.forward(&Tensor::ones(2, 4)),
            Err(NnError::TensorError(_))
        ));
    }

    #[test]
    fn test_random_init_and_parameter_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let layer = Linear::new(8, 4, &mut rng);
        assert_eq!(layer.weight().shape(), (8, 4));
        assert_eq!(layer.parameter_count(), 36);
        assert!(layer.bias().iter().all(|v| v == 0.0));
    }

    #[test]
    fn test_load_from_source() {
        let mut src: HashMap<String, Tensor> = HashMap::new();
        src.insert("mlp.c_fc.weight".into(), Tensor::ones(2, 3));
        src.insert("mlp.c_fc.bias".into(), Tensor::row_vector(&[1.0, 1.0, 1.0]));
        let layer = Linear::load(&src, "mlp.c_fc").unwrap();
        assert_eq!((layer.in_features, layer.out_features), (2, 3));
        assert!(matches!(
            Linear::load(&src, "mlp.c_proj"),
            Err(NnError::MissingWeight(_))
        ));
    }
}
