use std::sync::Arc;
use crate::analysis::analyzer::Analyzer;
use crate::core::error::{Error, ErrorKind, Result};
use crate::query::lexer::{QueryLexer, QueryToken};

/// A query operand after analysis. A stop-worded term rewrites to the
/// empty string and stays in the query as an always-empty operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Term(String),
    Phrase(Vec<String>),
    Proximity { distance: u32, left: String, right: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostfixToken {
    Operand(Operand),
    Operator(Operator),
}

/// Compiles a boolean query string to postfix: lex, validate, rewrite
/// operands through the analyzer, then Shunting-Yard. Operator keywords
/// never reach the analyzer; the lexer has already classified them.
pub struct QueryCompiler {
    lexer: QueryLexer,
    analyzer: Arc<Analyzer>,
}

impl QueryCompiler {
    pub fn new(analyzer: Arc<Analyzer>) -> Result<Self> {
        Ok(QueryCompiler {
            lexer: QueryLexer::new()?,
            analyzer,
        })
    }

    pub fn compile(&self, query: &str) -> Result<Vec<PostfixToken>> {
        let tokens = self.lexer.lex(query)?;
        if tokens.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("empty query {:?}", query),
            ));
        }
        self.validate(&tokens)?;
        Ok(self.to_postfix(tokens))
    }

    fn validate(&self, tokens: &[QueryToken]) -> Result<()> {
        let invalid = |message: String| Err(Error::new(ErrorKind::InvalidInput, message));

        let mut depth = 0usize;
        let mut prev: Option<&QueryToken> = None;

        for token in tokens {
            match token {
                QueryToken::Open => depth += 1,
                QueryToken::Close => {
                    if depth == 0 {
                        return invalid("parenthesis closes before opening".to_string());
                    }
                    depth -= 1;
                }
                QueryToken::Not => {
                    if let Some(p) = prev {
                        if !p.is_operator() && *p != QueryToken::Open {
                            return invalid("NOT must follow an operator or (".to_string());
                        }
                    }
                }
                QueryToken::And | QueryToken::Or => match prev {
                    None => return invalid("binary operator at query start".to_string()),
                    Some(p) if p.is_operator() || *p == QueryToken::Open => {
                        return invalid(
                            "binary operator adjacent to an operator or (".to_string(),
                        );
                    }
                    _ => {}
                },
                operand => {
                    if prev == Some(&QueryToken::Close) {
                        return invalid("operand directly follows )".to_string());
                    }
                    if let QueryToken::Proximity { distance: 0, .. } = operand {
                        return invalid("proximity distance must be at least 1".to_string());
                    }
                }
            }
            prev = Some(token);
        }

        if depth != 0 {
            return invalid("unbalanced parentheses".to_string());
        }
        if tokens.last().is_some_and(QueryToken::is_binary) {
            return invalid("binary operator at query end".to_string());
        }

        Ok(())
    }

    /// Shunting-Yard with NOT:3 > AND:2 = OR:2 > parens:1, NOT
    /// right-associative.
    fn to_postfix(&self, tokens: Vec<QueryToken>) -> Vec<PostfixToken> {
        let mut stack: Vec<QueryToken> = Vec::new();
        let mut postfix: Vec<PostfixToken> = Vec::new();

        for token in tokens {
            match token {
                QueryToken::And | QueryToken::Or | QueryToken::Not => {
                    let right_assoc = token == QueryToken::Not;
                    while let Some(top) = stack.last() {
                        let pops = top.is_operator()
                            && ((!right_assoc && precedence(&token) <= precedence(top))
                                || (right_assoc && precedence(&token) < precedence(top)));
                        if !pops {
                            break;
                        }
                        if let Some(op) = stack.pop().as_ref().and_then(operator_of) {
                            postfix.push(PostfixToken::Operator(op));
                        }
                    }
                    stack.push(token);
                }
                QueryToken::Open => stack.push(token),
                QueryToken::Close => {
                    while let Some(top) = stack.pop() {
                        if top == QueryToken::Open {
                            break;
                        }
                        if let Some(op) = operator_of(&top) {
                            postfix.push(PostfixToken::Operator(op));
                        }
                    }
                }
                operand => {
                    if let Some(operand) = self.rewrite(operand) {
                        postfix.push(PostfixToken::Operand(operand));
                    }
                }
            }
        }

        while let Some(top) = stack.pop() {
            if let Some(op) = operator_of(&top) {
                postfix.push(PostfixToken::Operator(op));
            }
        }

        postfix
    }

    /// Rewrite an operand token through the analyzer with the index-time
    /// options. Operators and parens have no operand form.
    fn rewrite(&self, token: QueryToken) -> Option<Operand> {
        match token {
            QueryToken::Word(word) => Some(Operand::Term(self.first_term(&word))),
            QueryToken::Phrase(content) => {
                Some(Operand::Phrase(self.analyzer.terms(&content)))
            }
            QueryToken::Proximity { distance, left, right } => Some(Operand::Proximity {
                distance,
                left: self.first_term(&left),
                right: self.first_term(&right),
            }),
            _ => None,
        }
    }

    fn first_term(&self, word: &str) -> String {
        self.analyzer.terms(word).into_iter().next().unwrap_or_default()
    }
}

fn precedence(token: &QueryToken) -> u8 {
    match token {
        QueryToken::Not => 3,
        QueryToken::And | QueryToken::Or => 2,
        QueryToken::Open | QueryToken::Close => 1,
        _ => 0,
    }
}

fn operator_of(token: &QueryToken) -> Option<Operator> {
    match token {
        QueryToken::And => Some(Operator::And),
        QueryToken::Or => Some(Operator::Or),
        QueryToken::Not => Some(Operator::Not),
        _ => None,
    }
}
