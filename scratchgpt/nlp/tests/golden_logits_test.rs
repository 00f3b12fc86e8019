mod common;

use common::{lcg_prompt, toy_config, toy_weights};
use rand::SeedableRng;
use rand::rngs::StdRng;
use scratchgpt_core::Tensor;
use scratchgpt_nlp::{GptModel, TRANSFORMER_PREFIX};
use serde::Deserialize;

#[derive(Deserialize)]
struct Golden {
    prompt: Vec<u32>,
    logits: Vec<Vec<f64>>,
}

fn golden() -> Golden {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/toy_logits.json");
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn toy_model_matches_reference_logits() {
    let golden = golden();
    let prompt = lcg_prompt(42, 5, 16);
    assert_eq!(prompt, golden.prompt);

    let model = GptModel::from_weights(toy_config(), &toy_weights("")).unwrap();
    let logits = model
        .forward(&prompt, &mut StdRng::seed_from_u64(0))
        .unwrap();
    assert_eq!(logits.shape(), (5, 16));

    let expected = Tensor::from_rows(&golden.logits).unwrap();
    for (i, (got, want)) in logits.to_rows().iter().zip(expected.to_rows()).enumerate() {
        for (j, (a, b)) in got.iter().zip(want).enumerate() {
            assert!((a - b).abs() < 1e-9, "logits[{}][{}]: {} vs {}", i, j, a, b);
        }
    }
}

#[test]
fn prefixed_checkpoint_gives_same_logits() {
    let plain = GptModel::from_weights(toy_config(), &toy_weights("")).unwrap();
    let prefixed = GptModel::from_weights(toy_config(), &toy_weights(TRANSFORMER_PREFIX)).unwrap();
    let ids = lcg_prompt(42, 5, 16);
    let a = plain.forward(&ids, &mut StdRng::seed_from_u64(1)).unwrap();
    let b = prefixed.forward(&ids, &mut StdRng::seed_from_u64(2)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn explicit_lm_head_equal_to_wte_matches_tied_output() {
    let tied = GptModel::from_weights(toy_config(), &toy_weights("")).unwrap();
    let mut weights = toy_weights("");
    let wte = weights["wte.weight"].clone();
    weights.insert("lm_head.weight".into(), wte);
    let untied = GptModel::from_weights(toy_config(), &weights).unwrap();
    assert!(untied.lm_head.is_some());

    let ids = [1, 2, 3];
    let a = tied.forward(&ids, &mut StdRng::seed_from_u64(0)).unwrap();
    let b = untied.forward(&ids, &mut StdRng::seed_from_u64(0)).unwrap();
    assert!(a.all_close(&b, 1e-12));
}

#[test]
fn causal_prefix_logits_are_stable() {
    let model = GptModel::from_weights(toy_config(), &toy_weights("")).unwrap();
    let ids = lcg_prompt(42, 5, 16);
    let full = model.forward(&ids, &mut StdRng::seed_from_u64(0)).unwrap();
    let prefix = model.forward(&ids[..3], &mut StdRng::seed_from_u64(0)).unwrap();
    for i in 0..3 {
        let a = full.row(i).unwrap();
        let b = prefix.row(i).unwrap();
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-12);
        }
    }
}

#[test]
fn wrong_shapes_are_rejected() {
    let mut weights = toy_weights("");
    weights.insert("wte.weight".into(), Tensor::zeros(15, 8));
    assert!(GptModel::from_weights(toy_config(), &weights).is_err());

    let mut weights = toy_weights("");
    weights.insert("lm_head.weight".into(), Tensor::zeros(8, 16));
    assert!(GptModel::from_weights(toy_config(), &weights).is_err());

    let mut weights = toy_weights("");
    weights.remove("h.0.attn.c_proj.bias");
    assert!(GptModel::from_weights(toy_config(), &weights).is_err());
}
