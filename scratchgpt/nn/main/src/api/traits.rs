//! Neural network traits

use crate::api::error::{NnError, NnResult};
use scratchgpt_core::Tensor;
use std::collections::HashMap;

/// Named parameter tensors, keyed by layer-qualified names such as
/// `h.0.attn.c_attn.weight`.
pub trait WeightSource {
    /// Look up a tensor by name.
    fn get(&self, name: &str) -> Option<&Tensor>;

    /// Look up a tensor that must be present.
    fn require(&self, name: &str) -> NnResult<&Tensor> {
        self.get(name)
            .ok_or_else(|| NnError::MissingWeight(name.to_string()))
    }

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl WeightSource for HashMap<String, Tensor> {
    fn get(&self, name: &str) -> Option<&Tensor> {
        HashMap::get(self, name)
    }
}

/// Join a parameter prefix and a local name with `.`; an empty prefix adds nothing.
pub fn param_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
