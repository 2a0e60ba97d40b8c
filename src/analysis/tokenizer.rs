use regex::Regex;
use crate::analysis::token::Token;
use crate::core::error::Result;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Splits on maximal runs of word characters (letters, digits, underscore).
/// Everything else is a separator.
pub struct WordTokenizer {
    word: Regex,
}

impl WordTokenizer {
    pub fn new() -> Result<Self> {
        Ok(WordTokenizer {
            word: Regex::new(r"\w+")?,
        })
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        self.word
            .find_iter(text)
            .map(|m| Token::new(m.as_str().to_string()))
            .collect()
    }
}
