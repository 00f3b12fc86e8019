//! GPT-2 parameter naming.
//!
//! Hugging Face exports of `GPT2LMHeadModel` put every transformer parameter
//! under `transformer.` (`transformer.h.0.attn.c_attn.weight`), while the
//! bare `GPT2Model` export and hand-built weight maps do not. [`Gpt2Weights`]
//! accepts either.

use scratchgpt_core::Tensor;
use scratchgpt_nn::WeightSource;

/// Prefix used by `GPT2LMHeadModel` checkpoints.
pub const TRANSFORMER_PREFIX: &str = "transformer.";

/// Name of the untied output projection, if a checkpoint carries one.
pub const LM_HEAD_WEIGHT: &str = "lm_head.weight";

/// Name of block `i`'s parameter group (`h.{i}`).
pub fn block_prefix(i: usize) -> String {
    format!("h.{}", i)
}

/// A [`WeightSource`] view that resolves `name` as given and then as
/// `transformer.{name}`.
pub struct Gpt2Weights<'a, S: WeightSource + ?Sized> {
    inner: &'a S,
}

impl<'a, S: WeightSource + ?Sized> Gpt2Weights<'a, S> {
    pub fn new(inner: &'a S) -> Self {
        Self { inner }
    }
}

impl<S: WeightSource + ?Sized> WeightSource for Gpt2Weights<'_, S> {
    fn get(&self, name: &str) -> Option<&Tensor> {
        self.inner
            .get(name)
            .or_else(|| self.inner.get(&format!("{}{}", TRANSFORMER_PREFIX, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_resolves_with_and_without_prefix() {
        let mut raw: HashMap<String, Tensor> = HashMap::new();
        raw.insert("transformer.wte.weight".into(), Tensor::ones(2, 2));
        raw.insert("lm_head.weight".into(), Tensor::zeros(2, 2));
        let w = Gpt2Weights::new(&raw);
        assert_eq!(w.get("wte.weight"), Some(&Tensor::ones(2, 2)));
        assert!(w.get(LM_HEAD_WEIGHT).is_some());
        assert!(w.get("wpe.weight").is_none());
        assert!(w.require("wpe.weight").is_err());
    }

    #[test]
    fn test_block_prefix() {
        assert_eq!(block_prefix(11), "h.11");
    }
}
