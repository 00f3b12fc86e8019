//! Sampling functions for language model inference.
//!
//! Operates on raw probability/logit slices (not Tensor).

use crate::api::error::{NlpError, NlpResult};
use rand::Rng;

/// Stable softmax over a single row of logits.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max_val = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&v| (v - max_val).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|&e| e / sum).collect()
}

/// Return the index of the maximum value; the first one wins on ties.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    let mut max_val = f64::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > max_val {
            max_val = v;
            best = i;
        }
    }
    best
}

/// Return indices of the top-n values in descending order.
///
/// The sort is stable, so equal values keep ascending index order.
pub fn top_n_indices(values: &[f64], n: usize) -> Vec<usize> {
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.iter().take(n).map(|&(i, _)| i).collect()
}

/// Top-N truncated sampling.
///
/// Keeps the `top_n` most probable indices (clamped to the distribution
/// size), renormalizes their probabilities, draws `r` uniformly from `[0, 1)`
/// and returns the first retained index whose cumulative probability exceeds
/// `r`. If rounding leaves `r` above the final cumulative value, the last
/// (least probable) retained index is returned.
pub fn sample_top_n<R: Rng + ?Sized>(probs: &[f64], top_n: usize, rng: &mut R) -> NlpResult<usize> {
    if top_n == 0 {
        return Err(NlpError::InvalidArgument("top_n must be at least 1".into()));
    }
    if probs.is_empty() {
        return Err(NlpError::InvalidArgument("cannot sample from an empty distribution".into()));
    }

    let top = top_n_indices(probs, top_n.min(probs.len()));
    let sum: f64 = top.iter().map(|&i| probs[i]).sum();

    let r: f64 = rng.r#gen();
    let mut cumulative = 0.0;
    for &i in &top {
        cumulative += probs[i] / sum;
        if r < cumulative {
            return Ok(i);
        }
    }
    Ok(top[top.len() - 1])
}
