use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use scratchgpt_core::Tensor;
use scratchgpt_nlp::{Generator, GptConfig, GptModel, argmax, sample_top_n, softmax, top_n_indices};

fn make_logits(size: usize) -> Vec<f64> {
    (0..size).map(|i| (i as f64 * 0.01).sin()).collect()
}

fn bench_argmax(c: &mut Criterion) {
    let logits = make_logits(50257);
    c.bench_function("argmax_50k", |b| b.iter(|| argmax(black_box(&logits))));
}

fn bench_top_n(c: &mut Criterion) {
    let probs = softmax(&make_logits(50257));
    let mut group = c.benchmark_group("top_n");
    for n in [1, 30, 100] {
        group.bench_function(format!("indices_n={}_vocab=50k", n), |b| {
            b.iter(|| top_n_indices(black_box(&probs), n))
        });
        group.bench_function(format!("sample_n={}_vocab=50k", n), |b| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| sample_top_n(black_box(&probs), n, &mut rng))
        });
    }
    group.finish();
}

fn bench_matmul(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let a = Tensor::randn(64, 768, &mut rng);
    let w = Tensor::randn(768, 768, &mut rng);
    c.bench_function("matmul_64x768x768", |b| {
        b.iter(|| black_box(&a).matmul(black_box(&w)))
    });
}

fn bench_decode_step(c: &mut Criterion) {
    let config = GptConfig {
        vocab_size: 256,
        n_positions: 64,
        n_embd: 64,
        n_layer: 2,
        n_head: 4,
        dropout: 0.0,
        layer_norm_eps: 1e-5,
    };
    let mut rng = StdRng::seed_from_u64(2);
    let model = GptModel::new(config, &mut rng).unwrap();
    let prompt: Vec<u32> = (0..16).collect();
    c.bench_function("generate_8_tokens_tiny", |b| {
        b.iter(|| {
            Generator::new(&model)
                .generate_tokens(black_box(&prompt), 8, &mut rng, |_| {})
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_argmax, bench_top_n, bench_matmul, bench_decode_step);
criterion_main!(benches);
