#![allow(dead_code)]

use scratchgpt_core::Tensor;
use scratchgpt_nlp::GptConfig;
use std::collections::HashMap;

/// 1 layer, 2 heads, 8-wide embeddings over a 16-token vocabulary.
pub fn toy_config() -> GptConfig {
    GptConfig {
        vocab_size: 16,
        n_positions: 8,
        n_embd: 8,
        n_layer: 1,
        n_head: 2,
        dropout: 0.0,
        layer_norm_eps: 1e-5,
    }
}

/// Deterministic parameter values: `sin(0.37 * i + 1.3 * param) * 0.2 + offset`.
fn fixed_tensor(param: usize, rows: usize, cols: usize, offset: f64) -> Tensor {
    let data = (0..rows * cols)
        .map(|i| ((i as f64) * 0.37 + (param as f64) * 1.3).sin() * 0.2 + offset)
        .collect();
    Tensor::from_vec(data, rows, cols).unwrap()
}

/// GPT-2 named weights for [`toy_config`], without an `lm_head` (tied output).
pub fn toy_weights(prefix: &str) -> HashMap<String, Tensor> {
    let (v, p, d) = (16, 8, 8);
    let layout: [(&str, usize, usize, f64); 16] = [
        ("wte.weight", v, d, 0.0),
        ("wpe.weight", p, d, 0.0),
        ("h.0.ln_1.weight", 1, d, 1.0),
        ("h.0.ln_1.bias", 1, d, 0.0),
        ("h.0.attn.c_attn.weight", d, 3 * d, 0.0),
        ("h.0.attn.c_attn.bias", 1, 3 * d, 0.0),
        ("h.0.attn.c_proj.weight", d, d, 0.0),
        ("h.0.attn.c_proj.bias", 1, d, 0.0),
        ("h.0.ln_2.weight", 1, d, 1.0),
        ("h.0.ln_2.bias", 1, d, 0.0),
        ("h.0.mlp.c_fc.weight", d, 4 * d, 0.0),
        ("h.0.mlp.c_fc.bias", 1, 4 * d, 0.0),
        ("h.0.mlp.c_proj.weight", 4 * d, d, 0.0),
        ("h.0.mlp.c_proj.bias", 1, d, 0.0),
        ("ln_f.weight", 1, d, 1.0),
        ("ln_f.bias", 1, d, 0.0),
    ];
    layout
        .iter()
        .enumerate()
        .map(|(param, &(name, rows, cols, offset))| {
            (format!("{}{}", prefix, name), fixed_tensor(param, rows, cols, offset))
        })
        .collect()
}

/// PCG-style LCG token stream, reproducible outside Rust.
pub fn lcg_prompt(seed: u64, len: usize, vocab: usize) -> Vec<u32> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % vocab as u64) as u32
        })
        .collect()
}
