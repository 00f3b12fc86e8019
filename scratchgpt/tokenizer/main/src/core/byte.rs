//! Byte-level tokenizer

use crate::api::error::{TokenizerError, TokenizerResult};
use crate::spi::contract::Tokenizer;

const BYTE_VOCAB: usize = 256;

/// Maps each UTF-8 byte to its value as a token ID.
///
/// Decoding is lossy where a token sequence splits a multi-byte character:
/// the partial character becomes U+FFFD.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteTokenizer;

impl Tokenizer for ByteTokenizer {
    fn encode(&self, text: &str) -> TokenizerResult<Vec<u32>> {
        Ok(text.bytes().map(u32::from).collect())
    }

    fn decode(&self, tokens: &[u32]) -> TokenizerResult<String> {
        let bytes = tokens
            .iter()
            .map(|&t| {
                u8::try_from(t).map_err(|_| TokenizerError::UnknownToken {
                    id: t,
                    vocab_size: BYTE_VOCAB,
                })
            })
            .collect::<TokenizerResult<Vec<u8>>>()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn vocab_size(&self) -> usize {
        BYTE_VOCAB
    }
}
