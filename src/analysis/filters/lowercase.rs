use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// ASCII-and-beyond case folding; non-ASCII letters lowercase where the
/// language defines it.
pub struct LowercaseFilter;

impl TokenFilter for LowercaseFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens.into_iter()
            .map(|mut token| {
                token.text = token.text.to_lowercase();
                token
            })
            .collect()
    }
}
