use log::warn;
use std::sync::Arc;
use crate::analysis::analyzer::Analyzer;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::index::posting::PostingStore;
use crate::query::compiler::QueryCompiler;
use crate::query::evaluator::QueryEvaluator;
use crate::scoring::scorer::{RankedDoc, TfIdfScorer};

/// Front door for query execution over a loaded index.
///
/// Malformed boolean queries are not errors at this level: they are logged
/// and return the empty result, matching the result-file contract.
pub struct QueryEngine {
    pub store: Arc<PostingStore>,
    pub analyzer: Arc<Analyzer>,
    compiler: QueryCompiler,
    evaluator: QueryEvaluator,
    scorer: TfIdfScorer,
}

impl QueryEngine {
    pub fn new(store: PostingStore, analyzer: Arc<Analyzer>, config: &Config) -> Result<Self> {
        let store = Arc::new(store);
        Ok(QueryEngine {
            compiler: QueryCompiler::new(analyzer.clone())?,
            evaluator: QueryEvaluator::new(store.clone()),
            scorer: TfIdfScorer::new(config.max_ranked_results),
            store,
            analyzer,
        })
    }

    /// Evaluate a boolean query; docIds ascending numerically.
    pub fn boolean(&self, query: &str) -> Vec<String> {
        let postfix = match self.compiler.compile(query) {
            Ok(postfix) => postfix,
            Err(err) => {
                warn!("invalid query {:?}: {}", query, err);
                return Vec::new();
            }
        };

        match self.evaluator.evaluate(&postfix) {
            Ok(doc_ids) => doc_ids,
            Err(err) => {
                warn!("query {:?} failed to evaluate: {}", query, err);
                Vec::new()
            }
        }
    }

    /// TF-IDF ranked free-text query, top K by `(-score, docIdAsInteger)`.
    pub fn ranked(&self, query: &str) -> Vec<RankedDoc> {
        self.scorer.rank(&self.store, &self.analyzer, query)
    }
}
