pub use crate::api::error::{TokenizerError, TokenizerResult};
pub use crate::core::byte::ByteTokenizer;
pub use crate::spi::contract::Tokenizer;
