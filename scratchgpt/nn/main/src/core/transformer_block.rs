//! Transformer block: pre-norm self-attention and feed-forward with residuals.

use crate::api::error::{NnError, NnResult};
use crate::api::traits::{WeightSource, param_name};
use crate::core::attention::MultiHeadAttention;
use crate::core::feed_forward::FeedForward;
use crate::core::layer_norm::LayerNorm;
use rand::Rng;
use scratchgpt_core::Tensor;
use std::time::Instant;

/// A single transformer block with pre-norm architecture.
///
/// Structure: `x -> norm1 -> attention -> + -> norm2 -> feed_forward -> +`
#[derive(Debug, Clone)]
pub struct TransformerBlock {
    pub norm1: LayerNorm,
    pub attention: MultiHeadAttention,
    pub norm2: LayerNorm,
    pub feed_forward: FeedForward,
}

impl TransformerBlock {
    /// Create a randomly initialized block whose attention maps `emb_dim -> emb_dim`.
    pub fn new<R: Rng + ?Sized>(
        emb_dim: usize,
        context_length: usize,
        num_heads: usize,
        dropout: f64,
        rng: &mut R,
    ) -> NnResult<Self> {
        Ok(Self {
            norm1: LayerNorm::new(emb_dim),
            attention: MultiHeadAttention::new(
                emb_dim,
                emb_dim,
                context_length,
                dropout,
                num_heads,
                rng,
            )?,
            norm2: LayerNorm::new(emb_dim),
            feed_forward: FeedForward::new(emb_dim, rng),
        })
    }

    /// Build from GPT-2 parameter names under `prefix` (e.g. `h.0`):
    /// `ln_1`, `attn.c_attn`, `attn.c_proj`, `ln_2`, `mlp.c_fc`, `mlp.c_proj`.
    pub fn load<S: WeightSource + ?Sized>(
        source: &S,
        prefix: &str,
        context_length: usize,
        dropout: f64,
        num_heads: usize,
        eps: f64,
    ) -> NnResult<Self> {
        Ok(Self {
            norm1: LayerNorm::load(source, &param_name(prefix, "ln_1"), eps)?,
            attention: MultiHeadAttention::load(
                source,
                &param_name(prefix, "attn"),
                context_length,
                dropout,
                num_heads,
            )?,
            norm2: LayerNorm::load(source, &param_name(prefix, "ln_2"), eps)?,
            feed_forward: FeedForward::load(source, &param_name(prefix, "mlp"))?,
        })
    }

    pub fn parameter_count(&self) -> usize {
        self.norm1.parameter_count()
            + self.attention.parameter_count()
            + self.norm2.parameter_count()
            + self.feed_forward.parameter_count()
    }

    pub fn forward<R: Rng + ?Sized>(&self, input: &Tensor, rng: &mut R) -> NnResult<Tensor> {
        let _t = if log::log_enabled!(log::Level::Debug) { Some(Instant::now()) } else { None };

        // x = x + attn(ln(x))
        let norm_1 = self.norm1.forward(input)?;
        let attn_out = self.attention.forward(&norm_1, rng)?;
        let x = residual(input, &attn_out)?;

        // x = x + ffn(ln(x))
        let norm_2 = self.norm2.forward(&x)?;
        let ffn_out = self.feed_forward.forward(&norm_2)?;
        let out = residual(&x, &ffn_out)?;

        if let Some(t) = _t {
            log::debug!("[perf] transformer_block::forward {:?} {:.3}ms",
                out.shape(), t.elapsed().as_secs_f64() * 1000.0);
        }
        Ok(out)
    }
}

/// Residual sum; shapes must be identical.
fn residual(x: &Tensor, sublayer: &Tensor) -> NnResult<Tensor> {
    if x.shape() != sublayer.shape() {
        return Err(NnError::ShapeMismatch(format!(
            "residual {:?} + {:?}",
            x.shape(),
            sublayer.shape()
        )));
    }
    Ok(x.add(sublayer)?)
}
