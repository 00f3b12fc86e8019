//! Embedding layer implementation

use crate::api::error::{NnError, NnResult};
use rand::Rng;
use scratchgpt_core::Tensor;
use std::time::Instant;

/// Embedding layer that maps token ids to dense vectors
#[derive(Debug, Clone)]
pub struct Embedding {
    /// Embedding weight matrix [num_embeddings, embedding_dim]
    pub(crate) weight: Tensor,
}

impl Embedding {
    /// Create a new embedding layer with random initialization
    pub fn new<R: Rng + ?Sized>(num_embeddings: usize, embedding_dim: usize, rng: &mut R) -> Self {
        // Standard normal initialization scaled by 0.02 (GPT-2 style)
        let weight = Tensor::random_normal(num_embeddings, embedding_dim, 0.0, 0.02, rng);
        Self { weight }
    }

    /// Create an embedding layer from existing weights
    pub fn from_weights(weight: Tensor) -> Self {
        Self { weight }
    }

    pub fn num_embeddings(&self) -> usize {
        self.weight.rows()
    }

    pub fn embedding_dim(&self) -> usize {
        self.weight.cols()
    }

    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    pub fn parameter_count(&self) -> usize {
        self.weight.numel()
    }

    /// Gather one row per id.
    ///
    /// Output shape: `[ids.len(), embedding_dim]`
    pub fn forward(&self, ids: &[u32]) -> NnResult<Tensor> {
        let _t = if log::log_enabled!(log::Level::Trace) { Some(Instant::now()) } else { None };

        let dim = self.embedding_dim();
        let mut data = Vec::with_capacity(ids.len() * dim);
        for &id in ids {
            let idx = id as usize;
            if idx >= self.num_embeddings() {
                return Err(NnError::IndexOutOfRange {
                    index: idx,
                    size: self.num_embeddings(),
                });
            }
            data.extend_from_slice(self.weight.row(idx)?);
        }

        let result = Tensor::from_vec(data, ids.len(), dim)?;
        if let Some(t) = _t {
            log::trace!("[perf] embedding::forward ids={} {:?} {:.3}ms",
                ids.len(), result.shape(), t.elapsed().as_secs_f64() * 1000.0);
        }
        Ok(result)
    }
}
