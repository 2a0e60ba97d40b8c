use regex::Regex;
use crate::core::error::{Error, ErrorKind, Result};

/// Lexical categories of the boolean query language.
///
/// Operator keywords are case-sensitive uppercase; `andy` or `and` are
/// ordinary word operands. Word runs are matched maximally, so `ANDY`
/// never lexes as `AND` + `Y`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryToken {
    And,
    Or,
    Not,
    Open,
    Close,
    Proximity { distance: u32, left: String, right: String },
    Phrase(String),
    Word(String),
}

impl QueryToken {
    pub fn is_operator(&self) -> bool {
        matches!(self, QueryToken::And | QueryToken::Or | QueryToken::Not)
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, QueryToken::And | QueryToken::Or)
    }
}

pub struct QueryLexer {
    splitter: Regex,
    proximity: Regex,
}

impl QueryLexer {
    pub fn new() -> Result<Self> {
        Ok(QueryLexer {
            splitter: Regex::new(
                r#"#\d+\(\w+,\s*\w+\)|"[^"]+"|'[^']+'|\w+|\(|\)"#,
            )?,
            proximity: Regex::new(r"#(\d+)\((\w+),\s*(\w+)\)")?,
        })
    }

    pub fn lex(&self, query: &str) -> Result<Vec<QueryToken>> {
        let mut tokens = Vec::new();

        for matched in self.splitter.find_iter(query) {
            let text = matched.as_str();
            let token = match text {
                "AND" => QueryToken::And,
                "OR" => QueryToken::Or,
                "NOT" => QueryToken::Not,
                "(" => QueryToken::Open,
                ")" => QueryToken::Close,
                _ if text.starts_with('#') => self.lex_proximity(text)?,
                _ if text.starts_with('"') || text.starts_with('\'') => {
                    QueryToken::Phrase(text[1..text.len() - 1].to_string())
                }
                _ => QueryToken::Word(text.to_string()),
            };
            tokens.push(token);
        }

        Ok(tokens)
    }

    fn lex_proximity(&self, text: &str) -> Result<QueryToken> {
        let caps = self.proximity.captures(text).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("malformed proximity expression {:?}", text),
            )
        })?;
        let distance = caps[1].parse::<u32>().map_err(|err| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("proximity distance in {:?}: {}", text, err),
            )
        })?;

        Ok(QueryToken::Proximity {
            distance,
            left: caps[2].to_string(),
            right: caps[3].to_string(),
        })
    }
}
