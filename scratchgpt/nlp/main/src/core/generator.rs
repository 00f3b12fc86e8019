//! Autoregressive decoding loop with top-N sampling and streaming callbacks.

use crate::api::error::NlpResult;
use crate::api::types::GenerationRequest;
use crate::core::gpt::GptModel;
use crate::core::sampling;
use rand::Rng;
use scratchgpt_tokenizer::Tokenizer;
use std::time::Instant;

/// Number of candidates kept by top-N sampling unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 30;

/// Drives a [`GptModel`] one token at a time.
///
/// Every step runs the full forward pass over prompt plus generated tokens,
/// takes the logits of the last position, applies softmax and picks the next
/// token with [`sampling::sample_top_n`]. A `top_n` of 1 is greedy decoding.
pub struct Generator<'a> {
    model: &'a GptModel,
    top_n: usize,
}

impl<'a> Generator<'a> {
    pub fn new(model: &'a GptModel) -> Self {
        Self {
            model,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Pick the next token for `tokens`.
    fn next_token<R: Rng + ?Sized>(&self, tokens: &[u32], rng: &mut R) -> NlpResult<u32> {
        let logits = self.model.forward(tokens, rng)?;
        let last = logits.row(logits.rows() - 1)?;
        let probs = sampling::softmax(last);
        Ok(sampling::sample_top_n(&probs, self.top_n, rng)? as u32)
    }

    fn run<R, F>(&self, prompt_ids: &[u32], n: usize, rng: &mut R, mut on_step: F) -> NlpResult<Vec<u32>>
    where
        R: Rng + ?Sized,
        F: FnMut(&[u32]) -> NlpResult<()>,
    {
        let mut tokens = prompt_ids.to_vec();
        if n == 0 {
            return Ok(tokens);
        }

        let start = Instant::now();
        log::info!(
            "generating {} tokens from a {}-token prompt (top_n={})",
            n,
            prompt_ids.len(),
            self.top_n
        );
        for _ in 0..n {
            let next = self.next_token(&tokens, rng)?;
            tokens.push(next);
            on_step(&tokens)?;
        }
        log::info!(
            "generated {} tokens in {:.3}s",
            n,
            start.elapsed().as_secs_f64()
        );
        Ok(tokens)
    }

    /// Generate `n` tokens after `prompt_ids`.
    ///
    /// `on_token` sees the full sequence after every step. Returns prompt
    /// plus continuation. Fails with `ContextLengthExceeded` as soon as the
    /// sequence fed to the model would be longer than its context.
    pub fn generate_tokens<R, F>(
        &self,
        prompt_ids: &[u32],
        n: usize,
        rng: &mut R,
        mut on_token: F,
    ) -> NlpResult<Vec<u32>>
    where
        R: Rng + ?Sized,
        F: FnMut(&[u32]),
    {
        self.run(prompt_ids, n, rng, |tokens| {
            on_token(tokens);
            Ok(())
        })
    }

    /// Encode `prompt`, generate `n` tokens and decode the result.
    ///
    /// `on_partial` receives the decoded text (prompt plus continuation so
    /// far) after each step. With `n == 0` the prompt is returned as-is and
    /// the model is never run.
    pub fn generate<T, R, F>(
        &self,
        tokenizer: &T,
        prompt: &str,
        n: usize,
        rng: &mut R,
        mut on_partial: F,
    ) -> NlpResult<String>
    where
        T: Tokenizer + ?Sized,
        R: Rng + ?Sized,
        F: FnMut(&str),
    {
        if n == 0 {
            return Ok(prompt.to_string());
        }
        let prompt_ids = tokenizer.encode(prompt)?;
        let tokens = self.run(&prompt_ids, n, rng, |tokens| {
            on_partial(&tokenizer.decode(tokens)?);
            Ok(())
        })?;
        Ok(tokenizer.decode(&tokens)?)
    }

    /// Serve a [`GenerationRequest`].
    pub fn generate_request<T, R, F>(
        &self,
        tokenizer: &T,
        request: &GenerationRequest,
        rng: &mut R,
        on_partial: F,
    ) -> NlpResult<String>
    where
        T: Tokenizer + ?Sized,
        R: Rng + ?Sized,
        F: FnMut(&str),
    {
        self.generate(tokenizer, &request.prompt, request.max_new_tokens, rng, on_partial)
    }
}
