//! Public configuration types for NLP models

use crate::api::error::{NlpError, NlpResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Token count used when a requested generation length cannot be parsed.
pub const FALLBACK_TOKEN_COUNT: usize = 10;

/// GPT-2 Model Configuration
///
/// Deserializes from a Hugging Face style `config.json`. `n_ctx` is read when
/// `n_positions` is absent and `layer_norm_epsilon` is accepted for
/// `layer_norm_eps`. Missing fields take the GPT-2 small values, except
/// `dropout`, which defaults to `0.0` because dropout is applied on every
/// forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGptConfig")]
pub struct GptConfig {
    /// Vocabulary size
    pub vocab_size: usize,
    /// Maximum sequence length (context window)
    pub n_positions: usize,
    /// Embedding dimension
    pub n_embd: usize,
    /// Number of transformer layers
    pub n_layer: usize,
    /// Number of attention heads
    pub n_head: usize,
    /// Dropout rate on attention weights
    pub dropout: f64,
    /// Layer normalization epsilon
    pub layer_norm_eps: f64,
}

/// Wire form of [`GptConfig`]; every field optional so that Hugging Face
/// configs carrying both `n_positions` and `n_ctx` parse cleanly.
#[derive(Deserialize)]
struct RawGptConfig {
    vocab_size: Option<usize>,
    n_positions: Option<usize>,
    n_ctx: Option<usize>,
    n_embd: Option<usize>,
    n_layer: Option<usize>,
    n_head: Option<usize>,
    dropout: Option<f64>,
    #[serde(alias = "layer_norm_epsilon")]
    layer_norm_eps: Option<f64>,
}

impl From<RawGptConfig> for GptConfig {
    fn from(raw: RawGptConfig) -> Self {
        let d = GptConfig::gpt2_small();
        Self {
            vocab_size: raw.vocab_size.unwrap_or(d.vocab_size),
            n_positions: raw.n_positions.or(raw.n_ctx).unwrap_or(d.n_positions),
            n_embd: raw.n_embd.unwrap_or(d.n_embd),
            n_layer: raw.n_layer.unwrap_or(d.n_layer),
            n_head: raw.n_head.unwrap_or(d.n_head),
            dropout: raw.dropout.unwrap_or(d.dropout),
            layer_norm_eps: raw.layer_norm_eps.unwrap_or(d.layer_norm_eps),
        }
    }
}

impl GptConfig {
    /// GPT-2 Small (124M parameters)
    pub fn gpt2_small() -> Self {
        Self {
            vocab_size: 50257,
            n_positions: 1024,
            n_embd: 768,
            n_layer: 12,
            n_head: 12,
            dropout: 0.0,
            layer_norm_eps: 1e-5,
        }
    }

    /// Dimension of one attention head.
    pub fn head_dim(&self) -> usize {
        self.n_embd / self.n_head.max(1)
    }

    pub fn validate(&self) -> NlpResult<()> {
        let sizes = [
            ("vocab_size", self.vocab_size),
            ("n_positions", self.n_positions),
            ("n_embd", self.n_embd),
            ("n_layer", self.n_layer),
            ("n_head", self.n_head),
        ];
        for (name, value) in sizes {
            if value == 0 {
                return Err(NlpError::InvalidConfig(format!("{} must be positive", name)));
            }
        }
        if self.n_embd % self.n_head != 0 {
            return Err(NlpError::InvalidConfig(format!(
                "n_embd ({}) must be divisible by n_head ({})",
                self.n_embd, self.n_head
            )));
        }
        if !(0.0..=1.0).contains(&self.dropout) {
            return Err(NlpError::InvalidConfig(format!(
                "dropout ({}) must be in [0, 1]",
                self.dropout
            )));
        }
        if self.layer_norm_eps.is_nan() || self.layer_norm_eps <= 0.0 {
            return Err(NlpError::InvalidConfig(format!(
                "layer_norm_eps ({}) must be positive",
                self.layer_norm_eps
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> NlpResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> NlpResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

impl Default for GptConfig {
    fn default() -> Self {
        Self::gpt2_small()
    }
}

/// A single text generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_new_tokens: usize,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, max_new_tokens: usize) -> Self {
        Self {
            prompt: prompt.into(),
            max_new_tokens,
        }
    }

    /// Build a request from raw user input; see [`parse_token_count`].
    pub fn parse(prompt: impl Into<String>, count_text: &str) -> Self {
        Self::new(prompt, parse_token_count(count_text))
    }
}

/// Parse a requested generation length.
///
/// Surrounding whitespace is ignored. Anything that is not a non-negative
/// integer yields [`FALLBACK_TOKEN_COUNT`].
pub fn parse_token_count(text: &str) -> usize {
    match text.trim().parse::<usize>() {
        Ok(n) => n,
        Err(_) => {
            log::warn!(
                "invalid token count {:?}, going with {}",
                text,
                FALLBACK_TOKEN_COUNT
            );
            FALLBACK_TOKEN_COUNT
        }
    }
}
