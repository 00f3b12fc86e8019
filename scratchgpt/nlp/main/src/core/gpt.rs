//! GPT-2 model assembly.
//!
//! ```text
//! Input token IDs  [S]
//!       |
//!   wte (token embedding)   +   wpe (position embedding)
//!       |
//!   n_layer x TransformerBlock:
//!       |-- LayerNorm (ln_1)
//!       |-- MultiHeadAttention (fused QKV via c_attn)
//!       |-- Residual add
//!       |-- LayerNorm (ln_2)
//!       |-- FeedForward: Linear(c_fc) -> GELU -> Linear(c_proj)
//!       |-- Residual add
//!       |
//!   LayerNorm (ln_f)
//!       |
//!   Logits = hidden @ wte.weight^T   (weight tying, unless lm_head is present)
//! ```
//!
//! The whole sequence is recomputed on every call; there is no KV cache.

use crate::api::error::{NlpError, NlpResult};
use crate::api::types::GptConfig;
use crate::core::weight_map::{Gpt2Weights, LM_HEAD_WEIGHT, block_prefix};
use rand::Rng;
use scratchgpt_core::Tensor;
use scratchgpt_nn::{Embedding, LayerNorm, Linear, TransformerBlock, WeightSource};
use std::time::Instant;

/// GPT-2 language model.
///
/// Token embedding (`wte`), learned position embedding (`wpe`), a stack of
/// pre-norm transformer blocks, a final layer norm (`ln_f`) and an output
/// projection that is weight-tied to `wte` unless `lm_head` is set.
#[derive(Debug, Clone)]
pub struct GptModel {
    /// Model configuration
    pub config: GptConfig,
    /// Token embeddings
    pub wte: Embedding,
    /// Position embeddings
    pub wpe: Embedding,
    /// Transformer blocks
    pub blocks: Vec<TransformerBlock>,
    /// Final layer normalization
    pub ln_f: LayerNorm,
    /// Untied output projection `[n_embd, vocab_size]`
    pub lm_head: Option<Linear>,
}

impl GptModel {
    /// Create a new randomly initialized GPT model
    pub fn new<R: Rng + ?Sized>(config: GptConfig, rng: &mut R) -> NlpResult<Self> {
        config.validate()?;
        let wte = Embedding::new(config.vocab_size, config.n_embd, rng);
        let wpe = Embedding::new(config.n_positions, config.n_embd, rng);
        let blocks = (0..config.n_layer)
            .map(|_| {
                TransformerBlock::new(
                    config.n_embd,
                    config.n_positions,
                    config.n_head,
                    config.dropout,
                    rng,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let ln_f = LayerNorm::with_eps(config.n_embd, config.layer_norm_eps);

        let model = Self {
            config,
            wte,
            wpe,
            blocks,
            ln_f,
            lm_head: None,
        };
        log::info!(
            "GptModel initialized: {} layers, {} params",
            model.blocks.len(),
            model.parameter_count()
        );
        Ok(model)
    }

    /// Load a model from GPT-2 named weights.
    ///
    /// Names may carry the `transformer.` prefix or not. When
    /// `lm_head.weight` (stored `[vocab_size, n_embd]`) is absent the output
    /// projection is tied to `wte`.
    pub fn from_weights<S: WeightSource + ?Sized>(config: GptConfig, source: &S) -> NlpResult<Self> {
        config.validate()?;
        let weights = Gpt2Weights::new(source);

        let wte = weights.require("wte.weight")?;
        if wte.shape() != (config.vocab_size, config.n_embd) {
            return Err(NlpError::InvalidConfig(format!(
                "wte.weight is {:?}, config expects {:?}",
                wte.shape(),
                (config.vocab_size, config.n_embd)
            )));
        }
        let wpe = weights.require("wpe.weight")?;
        if wpe.rows() < config.n_positions || wpe.cols() != config.n_embd {
            return Err(NlpError::InvalidConfig(format!(
                "wpe.weight is {:?}, config expects at least {:?}",
                wpe.shape(),
                (config.n_positions, config.n_embd)
            )));
        }

        let blocks = (0..config.n_layer)
            .map(|i| {
                TransformerBlock::load(
                    &weights,
                    &block_prefix(i),
                    config.n_positions,
                    config.dropout,
                    config.n_head,
                    config.layer_norm_eps,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let ln_f = LayerNorm::load(&weights, "ln_f", config.layer_norm_eps)?;

        let lm_head = match weights.get(LM_HEAD_WEIGHT) {
            Some(w) => {
                if w.shape() != (config.vocab_size, config.n_embd) {
                    return Err(NlpError::InvalidConfig(format!(
                        "{} is {:?}, config expects {:?}",
                        LM_HEAD_WEIGHT,
                        w.shape(),
                        (config.vocab_size, config.n_embd)
                    )));
                }
                Some(Linear::from_weights(
                    w.transpose(),
                    Tensor::zeros(1, config.vocab_size),
                )?)
            }
            None => None,
        };

        let model = Self {
            wte: Embedding::from_weights(wte.clone()),
            wpe: Embedding::from_weights(wpe.clone()),
            blocks,
            ln_f,
            lm_head,
            config,
        };
        log::info!(
            "GptModel loaded: {} layers, {} params, tied head: {}",
            model.blocks.len(),
            model.parameter_count(),
            model.lm_head.is_none()
        );
        Ok(model)
    }

    /// Forward pass over one sequence.
    ///
    /// Returns logits of shape `[ids.len(), vocab_size]`.
    pub fn forward<R: Rng + ?Sized>(&self, ids: &[u32], rng: &mut R) -> NlpResult<Tensor> {
        if ids.is_empty() {
            return Err(NlpError::EmptyInput);
        }
        if ids.len() > self.config.n_positions {
            return Err(NlpError::ContextLengthExceeded {
                max: self.config.n_positions,
                actual: ids.len(),
            });
        }

        let _t_total = if log::log_enabled!(log::Level::Debug) { Some(Instant::now()) } else { None };

        let positions: Vec<u32> = (0..ids.len() as u32).collect();
        let token_embeds = self.wte.forward(ids)?;
        let position_embeds = self.wpe.forward(&positions)?;
        let mut hidden = token_embeds.add(&position_embeds)?;

        for block in &self.blocks {
            hidden = block.forward(&hidden, rng)?;
        }
        hidden = self.ln_f.forward(&hidden)?;

        let logits = match &self.lm_head {
            Some(head) => head.forward(&hidden)?,
            None => hidden.matmul(&self.wte.weight().transpose())?,
        };

        if let Some(t) = _t_total {
            log::debug!("[perf] model::forward seq={} layers={} total={:.3}ms",
                ids.len(), self.blocks.len(), t.elapsed().as_secs_f64() * 1000.0);
        }
        Ok(logits)
    }

    pub fn parameter_count(&self) -> usize {
        self.wte.parameter_count()
            + self.wpe.parameter_count()
            + self.blocks.iter().map(TransformerBlock::parameter_count).sum::<usize>()
            + self.ln_f.parameter_count()
            + self.lm_head.as_ref().map_or(0, Linear::parameter_count)
    }

    /// Get the model's vocabulary size
    pub fn vocab_size(&self) -> usize {
        self.config.vocab_size
    }

    /// Get the model's maximum sequence length
    pub fn max_sequence_length(&self) -> usize {
        self.config.n_positions
    }
}
