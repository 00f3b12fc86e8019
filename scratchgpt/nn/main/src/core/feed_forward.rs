//! Position-wise feed-forward sublayer with GELU.

use crate::api::error::{NnError, NnResult};
use crate::api::traits::{WeightSource, param_name};
use crate::core::linear::Linear;
use rand::Rng;
use scratchgpt_core::Tensor;

/// Expansion factor of the hidden layer relative to the embedding width.
pub const EXPANSION: usize = 4;

/// Feed-forward network (MLP) used in transformer blocks:
/// `fc2(gelu(fc1(x)))`, expanding `d -> 4d -> d`.
#[derive(Debug, Clone)]
pub struct FeedForward {
    pub fc1: Linear,
    pub fc2: Linear,
}

impl FeedForward {
    pub fn new<R: Rng + ?Sized>(emb_dim: usize, rng: &mut R) -> Self {
        let hidden = EXPANSION * emb_dim;
        Self {
            fc1: Linear::new(emb_dim, hidden, rng),
            fc2: Linear::new(hidden, emb_dim, rng),
        }
    }

    /// Construct from pre-loaded projection layers.
    pub fn from_weights(fc1: Linear, fc2: Linear) -> NnResult<Self> {
        if fc1.out_features != fc2.in_features || fc1.in_features != fc2.out_features {
            return Err(NnError::ShapeMismatch(format!(
                "FeedForward projections {}->{} and {}->{} do not compose",
                fc1.in_features, fc1.out_features, fc2.in_features, fc2.out_features
            )));
        }
        Ok(Self { fc1, fc2 })
    }

    /// Build from GPT-2 style `{prefix}.c_fc` and `{prefix}.c_proj`.
    pub fn load<S: WeightSource + ?Sized>(source: &S, prefix: &str) -> NnResult<Self> {
        let fc1 = Linear::load(source, &param_name(prefix, "c_fc"))?;
        let fc2 = Linear::load(source, &param_name(prefix, "c_proj"))?;
        Self::from_weights(fc1, fc2)
    }

    pub fn hidden_dim(&self) -> usize {
        self.fc1.out_features
    }

    pub fn parameter_count(&self) -> usize {
        self.fc1.parameter_count() + self.fc2.parameter_count()
    }

    pub fn forward(&self, x: &Tensor) -> NnResult<Tensor> {
        let hidden = self.fc1.forward(x)?.gelu();
        self.fc2.forward(&hidden)
    }
}
