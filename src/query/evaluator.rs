use log::warn;
use std::collections::HashSet;
use std::sync::Arc;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::compare_doc_ids;
use crate::index::posting::PostingStore;
use crate::query::compiler::{Operand, Operator, PostfixToken};

/// Postfix stack machine over docId sets.
///
/// The universe for NOT is cached from `meta.doc_ids` at construction;
/// evaluation is read-only on the store, so concurrent queries share one
/// evaluator freely.
pub struct QueryEvaluator {
    pub store: Arc<PostingStore>,
    universe: HashSet<String>,
}

impl QueryEvaluator {
    pub fn new(store: Arc<PostingStore>) -> Self {
        let universe = store.meta.doc_ids.iter().cloned().collect();
        QueryEvaluator { store, universe }
    }

    /// Evaluate a compiled query; the result is docIds in ascending
    /// numeric order.
    pub fn evaluate(&self, postfix: &[PostfixToken]) -> Result<Vec<String>> {
        let mut stack: Vec<HashSet<String>> = Vec::new();

        for token in postfix {
            match token {
                PostfixToken::Operand(operand) => stack.push(self.resolve(operand)),
                PostfixToken::Operator(Operator::Not) => {
                    let operand = pop(&mut stack)?;
                    stack.push(self.universe.difference(&operand).cloned().collect());
                }
                PostfixToken::Operator(op) => {
                    let right = pop(&mut stack)?;
                    let left = pop(&mut stack)?;
                    let result = match op {
                        Operator::And => left.intersection(&right).cloned().collect(),
                        _ => left.union(&right).cloned().collect(),
                    };
                    stack.push(result);
                }
            }
        }

        let result = pop(&mut stack)?;
        if !stack.is_empty() {
            warn!("query left {} unconsumed operands", stack.len());
        }

        let mut doc_ids: Vec<String> = result.into_iter().collect();
        doc_ids.sort_by(|a, b| compare_doc_ids(a, b));
        Ok(doc_ids)
    }

    fn resolve(&self, operand: &Operand) -> HashSet<String> {
        match operand {
            Operand::Term(term) => self.resolve_term(term),
            Operand::Phrase(terms) => self.resolve_phrase(terms),
            Operand::Proximity { distance, left, right } => {
                self.resolve_proximity(*distance, left, right)
            }
        }
    }

    /// Missing terms resolve to the empty set, never an error. The empty
    /// term (a stop-worded operand) misses by construction.
    fn resolve_term(&self, term: &str) -> HashSet<String> {
        self.store
            .postings(term)
            .map(|record| record.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Docs where the terms occur at strictly consecutive positions.
    fn resolve_phrase(&self, terms: &[String]) -> HashSet<String> {
        let mut docs = HashSet::new();

        let Some(first) = terms.first() else { return docs };
        let Some(first_record) = self.store.postings(first) else {
            return docs;
        };
        let rest: Option<Vec<_>> = terms[1..]
            .iter()
            .map(|term| self.store.postings(term))
            .collect();
        let Some(rest) = rest else { return docs };

        for (doc_id, positions) in first_record {
            let followers: Option<Vec<&Vec<u32>>> =
                rest.iter().map(|record| record.get(doc_id)).collect();
            let Some(followers) = followers else { continue };

            let matched = positions.iter().any(|&p| {
                followers
                    .iter()
                    .enumerate()
                    .all(|(i, follower)| follower.binary_search(&(p + 1 + i as u32)).is_ok())
            });
            if matched {
                docs.insert(doc_id.clone());
            }
        }

        docs
    }

    /// Docs where the two terms occur within `distance` positions of each
    /// other, in either order.
    fn resolve_proximity(&self, distance: u32, left: &str, right: &str) -> HashSet<String> {
        let mut docs = HashSet::new();

        let (Some(left_record), Some(right_record)) =
            (self.store.postings(left), self.store.postings(right))
        else {
            return docs;
        };

        for (doc_id, left_positions) in left_record {
            let Some(right_positions) = right_record.get(doc_id) else {
                continue;
            };
            let close = left_positions.iter().any(|&p1| {
                right_positions
                    .iter()
                    .any(|&p2| p1.abs_diff(p2) <= distance)
            });
            if close {
                docs.insert(doc_id.clone());
            }
        }

        docs
    }
}

fn pop(stack: &mut Vec<HashSet<String>>) -> Result<HashSet<String>> {
    stack.pop().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidInput,
            "operator is missing an operand".to_string(),
        )
    })
}
