use rand::SeedableRng;
use rand::rngs::StdRng;
use scratchgpt_nlp::{
    DEFAULT_TOP_N, GenerationRequest, Generator, GptConfig, GptModel, NlpError, argmax,
};
use scratchgpt_tokenizer::ByteTokenizer;

fn byte_model(n_positions: usize) -> GptModel {
    let config = GptConfig {
        vocab_size: 256,
        n_positions,
        n_embd: 16,
        n_layer: 2,
        n_head: 4,
        dropout: 0.0,
        layer_norm_eps: 1e-5,
    };
    GptModel::new(config, &mut StdRng::seed_from_u64(7)).unwrap()
}

#[test]
fn greedy_generation_follows_argmax() {
    let model = byte_model(16);
    let mut rng = StdRng::seed_from_u64(0);
    let out = Generator::new(&model)
        .with_top_n(1)
        .generate_tokens(&[104, 105], 5, &mut rng, |_| {})
        .unwrap();

    let mut expected = vec![104, 105];
    for _ in 0..5 {
        let logits = model.forward(&expected, &mut rng).unwrap();
        let last = logits.row(logits.rows() - 1).unwrap();
        expected.push(argmax(last) as u32);
    }
    assert_eq!(out, expected);
}

#[test]
fn streams_decoded_text_after_each_token() {
    let model = byte_model(16);
    let mut partials = Vec::new();
    let text = Generator::new(&model)
        .generate(&ByteTokenizer, "ab", 4, &mut StdRng::seed_from_u64(1), |p| {
            partials.push(p.to_string())
        })
        .unwrap();

    assert_eq!(partials.len(), 4);
    assert_eq!(partials.last(), Some(&text));
    assert!(partials.iter().all(|p| p.starts_with("ab")));
}

#[test]
fn zero_tokens_returns_prompt_untouched() {
    let model = byte_model(4);
    let mut called = false;
    let text = Generator::new(&model)
        .generate(&ByteTokenizer, "longer than four", 0, &mut StdRng::seed_from_u64(2), |_| {
            called = true
        })
        .unwrap();
    assert_eq!(text, "longer than four");
    assert!(!called);
}

#[test]
fn prompt_longer_than_context_fails() {
    let model = byte_model(4);
    let err = Generator::new(&model)
        .generate(&ByteTokenizer, "hello", 1, &mut StdRng::seed_from_u64(3), |_| {})
        .unwrap_err();
    assert!(matches!(err, NlpError::ContextLengthExceeded { max: 4, actual: 5 }));
}

#[test]
fn request_with_unparseable_count_generates_fallback_amount() {
    let model = byte_model(32);
    let request = GenerationRequest::parse("go", "ten please");
    let mut steps = 0;
    Generator::new(&model)
        .generate_request(&ByteTokenizer, &request, &mut StdRng::seed_from_u64(4), |_| {
            steps += 1
        })
        .unwrap();
    assert_eq!(steps, 10);
}

#[test]
fn default_sampling_stays_in_vocabulary() {
    let model = byte_model(24);
    let generator = Generator::new(&model);
    assert_eq!(generator.top_n(), DEFAULT_TOP_N);
    let out = generator
        .generate_tokens(&[0], 20, &mut StdRng::seed_from_u64(5), |_| {})
        .unwrap();
    assert_eq!(out.len(), 21);
    assert!(out.iter().all(|&t| t < 256));
}

#[test]
fn one_model_serves_concurrent_requests() {
    let model = byte_model(16);
    let outputs: Vec<Vec<u32>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                let model = &model;
                s.spawn(move || {
                    Generator::new(model)
                        .generate_tokens(&[65], 6, &mut StdRng::seed_from_u64(seed), |_| {})
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (seed, out) in outputs.iter().enumerate() {
        let expected = Generator::new(&model)
            .generate_tokens(&[65], 6, &mut StdRng::seed_from_u64(seed as u64), |_| {})
            .unwrap();
        assert_eq!(out, &expected);
    }
}
