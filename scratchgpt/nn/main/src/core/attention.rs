//! Multi-head causal self-attention.

use crate::api::error::{NnError, NnResult};
use crate::api::traits::{WeightSource, param_name};
use crate::core::linear::{Linear, as_row_vector};
use rand::Rng;
use scratchgpt_core::{Tensor, functional};
use std::time::Instant;

/// Multi-head causal self-attention.
///
/// Queries, keys and values are projected by three independent [`Linear`]
/// layers and split into `num_heads` contiguous column ranges of width
/// `head_dim = d_out / num_heads`. Each head computes
/// `softmax(mask(Q·Kᵀ / sqrt(head_dim)))`, applies dropout and multiplies by
/// `V`; head outputs are placed side by side in head order and passed through
/// the output projection.
///
/// The causal mask is built once for `context_length` positions and the
/// leading `seq x seq` block is used on every call.
#[derive(Debug, Clone)]
pub struct MultiHeadAttention {
    d_in: usize,
    d_out: usize,
    num_heads: usize,
    head_dim: usize,
    context_length: usize,
    dropout: f64,
    mask: Tensor,

    pub q_proj: Linear,
    pub k_proj: Linear,
    pub v_proj: Linear,
    pub out_proj: Linear,
}

impl MultiHeadAttention {
    /// Create a new attention layer with randomly initialized projections.
    ///
    /// # Arguments
    /// * `d_in` - Input feature width
    /// * `d_out` - Width of Q/K/V and of the output
    /// * `context_length` - Longest sequence the layer accepts
    /// * `dropout` - Rate applied to the attention weights, in `[0, 1]`
    /// * `num_heads` - Number of heads; must divide `d_out`
    pub fn new<R: Rng + ?Sized>(
        d_in: usize,
        d_out: usize,
        context_length: usize,
        dropout: f64,
        num_heads: usize,
        rng: &mut R,
    ) -> NnResult<Self> {
        Self::check_config(d_out, num_heads, dropout)?;
        Ok(Self {
            d_in,
            d_out,
            num_heads,
            head_dim: d_out / num_heads,
            context_length,
            dropout,
            mask: Tensor::causal_mask(context_length),
            q_proj: Linear::new(d_in, d_out, rng),
            k_proj: Linear::new(d_in, d_out, rng),
            v_proj: Linear::new(d_in, d_out, rng),
            out_proj: Linear::new(d_out, d_out, rng),
        })
    }

    fn check_config(d_out: usize, num_heads: usize, dropout: f64) -> NnResult<()> {
        if num_heads == 0 {
            return Err(NnError::InvalidConfig("num_heads must be positive".into()));
        }
        if d_out % num_heads != 0 {
            return Err(NnError::InvalidConfig(format!(
                "d_out ({}) must be divisible by num_heads ({})",
                d_out, num_heads
            )));
        }
        if !(0.0..=1.0).contains(&dropout) {
            return Err(NnError::InvalidConfig(format!(
                "dropout ({}) must be in [0, 1]",
                dropout
            )));
        }
        Ok(())
    }

    /// Build from GPT-2 style `{prefix}.c_attn` (fused QKV) and `{prefix}.c_proj`.
    pub fn load<S: WeightSource + ?Sized>(
        source: &S,
        prefix: &str,
        context_length: usize,
        dropout: f64,
        num_heads: usize,
    ) -> NnResult<Self> {
        let qkv_weight = source.require(&param_name(prefix, "c_attn.weight"))?;
        let qkv_bias = source.require(&param_name(prefix, "c_attn.bias"))?;
        let proj_weight = source.require(&param_name(prefix, "c_proj.weight"))?;
        let proj_bias = source.require(&param_name(prefix, "c_proj.bias"))?;

        let (d_in, fused) = qkv_weight.shape();
        if fused % 3 != 0 {
            return Err(NnError::ShapeMismatch(format!(
                "fused QKV width {} is not a multiple of 3",
                fused
            )));
        }
        let d_out = fused / 3;
        Self::check_config(d_out, num_heads, dropout)?;

        let mut attn = Self {
            d_in,
            d_out,
            num_heads,
            head_dim: d_out / num_heads,
            context_length,
            dropout,
            mask: Tensor::causal_mask(context_length),
            q_proj: Linear::zeros(d_in, d_out),
            k_proj: Linear::zeros(d_in, d_out),
            v_proj: Linear::zeros(d_in, d_out),
            out_proj: Linear::zeros(d_out, d_out),
        };
        attn.load_fused_qkv(qkv_weight, qkv_bias)?;
        attn.load_out_proj(proj_weight.clone(), proj_bias.clone())?;
        Ok(attn)
    }

    /// Install a fused `[d_in, 3*d_out]` QKV weight and its `3*d_out` bias.
    ///
    /// Columns are split into thirds: the first goes to the query projection,
    /// the second to the key projection, the last to the value projection.
    pub fn load_fused_qkv(&mut self, weight: &Tensor, bias: &Tensor) -> NnResult<()> {
        if weight.shape() != (self.d_in, 3 * self.d_out) {
            return Err(NnError::ShapeMismatch(format!(
                "fused QKV weight {:?}, expected {:?}",
                weight.shape(),
                (self.d_in, 3 * self.d_out)
            )));
        }
        let bias = as_row_vector(bias.clone(), 3 * self.d_out, "fused QKV bias")?;

        let weights = weight.split_cols(3)?;
        let biases = bias.split_cols(3)?;
        for ((proj, w), b) in [&mut self.q_proj, &mut self.k_proj, &mut self.v_proj]
            .into_iter()
            .zip(weights)
            .zip(biases)
        {
            proj.set_weights(w)?;
            proj.set_bias(b)?;
        }
        Ok(())
    }

    /// Install the output projection.
    pub fn load_out_proj(&mut self, weight: Tensor, bias: Tensor) -> NnResult<()> {
        self.out_proj.set_weights(weight)?;
        self.out_proj.set_bias(bias)
    }

    pub fn num_heads(&self) -> usize {
        self.num_heads
    }

    pub fn head_dim(&self) -> usize {
        self.head_dim
    }

    pub fn context_length(&self) -> usize {
        self.context_length
    }

    pub fn dropout(&self) -> f64 {
        self.dropout
    }

    /// The precomputed `context_length x context_length` causal mask.
    pub fn mask(&self) -> &Tensor {
        &self.mask
    }

    pub fn parameter_count(&self) -> usize {
        self.q_proj.parameter_count()
            + self.k_proj.parameter_count()
            + self.v_proj.parameter_count()
            + self.out_proj.parameter_count()
    }

    fn check_seq_len(&self, x: &Tensor) -> NnResult<usize> {
        let seq = x.rows();
        if seq > self.context_length {
            return Err(NnError::SequenceTooLong {
                max: self.context_length,
                actual: seq,
            });
        }
        Ok(seq)
    }

    /// Post-softmax, post-dropout attention weights of one head for `q` and `k`.
    fn head_weights<R: Rng + ?Sized>(
        &self,
        q: &Tensor,
        k: &Tensor,
        head: usize,
        rng: &mut R,
    ) -> NnResult<Tensor> {
        let seq = q.rows();
        let (start, end) = (head * self.head_dim, (head + 1) * self.head_dim);
        let qh = q.sub_matrix(0, seq, start, end)?;
        let kh = k.sub_matrix(0, seq, start, end)?;

        let scores = qh
            .matmul(&kh.transpose())?
            .div_scalar((self.head_dim as f64).sqrt());
        let mask = self.mask.sub_matrix(0, seq, 0, seq)?;
        let weights = functional::apply_mask(&scores, &mask)?.softmax();
        Ok(functional::dropout(&weights, self.dropout, rng)?)
    }

    /// Attention weights `[seq, seq]` of a single head, exposed for inspection.
    pub fn attention_weights<R: Rng + ?Sized>(
        &self,
        x: &Tensor,
        head: usize,
        rng: &mut R,
    ) -> NnResult<Tensor> {
        if head >= self.num_heads {
            return Err(NnError::IndexOutOfRange {
                index: head,
                size: self.num_heads,
            });
        }
        self.check_seq_len(x)?;
        let q = self.q_proj.forward(x)?;
        let k = self.k_proj.forward(x)?;
        self.head_weights(&q, &k, head, rng)
    }

    /// Forward pass.
    ///
    /// Input shape: `[seq, d_in]` with `seq <= context_length`.
    /// Output shape: `[seq, d_out]`.
    pub fn forward<R: Rng + ?Sized>(&self, x: &Tensor, rng: &mut R) -> NnResult<Tensor> {
        let _t = if log::log_enabled!(log::Level::Debug) {
            Some(Instant::now())
        } else {
            None
        };

        let seq = self.check_seq_len(x)?;
        let q = self.q_proj.forward(x)?;
        let k = self.k_proj.forward(x)?;
        let v = self.v_proj.forward(x)?;

        let mut heads = Vec::with_capacity(self.num_heads);
        for h in 0..self.num_heads {
            let weights = self.head_weights(&q, &k, h, rng)?;
            let vh = v.sub_matrix(0, seq, h * self.head_dim, (h + 1) * self.head_dim)?;
            heads.push(weights.matmul(&vh)?);
        }
        let context = Tensor::concat_cols(&heads)?;
        let out = self.out_proj.forward(&context)?;

        if let Some(t) = _t {
            log::debug!(
                "[perf] attention::forward seq={} heads={} {:.3}ms",
                seq,
                self.num_heads,
                t.elapsed().as_secs_f64() * 1000.0
            );
        }
        Ok(out)
    }
}
