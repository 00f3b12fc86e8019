use crate::api::error::TokenizerResult;

/// Text <-> token-id mapping consumed by the decoding loop.
///
/// Ids are `u32` and must be below [`Tokenizer::vocab_size`]. Re-encoding the
/// output of `decode` for valid ids must give back the same text.
/// Implementations are shared read-only between generation requests, hence
/// the `Send + Sync` bound.
pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str) -> TokenizerResult<Vec<u32>>;

    /// Turn ids back into text; ids outside the vocabulary are an error.
    fn decode(&self, tokens: &[u32]) -> TokenizerResult<String>;

    fn vocab_size(&self) -> usize;
}
