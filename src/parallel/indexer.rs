use log::info;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use crate::analysis::analyzer::Analyzer;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{NewsBatch, NewsFragment};
use crate::index::posting::PostingStore;

/// Parallel positional index builder
///
/// Each source's fragments are cut into contiguous sub-batches, one per
/// worker; every worker builds a private local store, and the locals are
/// merged at the join barrier. The universe is assembled from the batch
/// doc_ids before fan-out, so workers never touch shared state.
pub struct BatchIndexer {
    pub analyzer: Arc<Analyzer>,
    pub workers: usize,
}

impl BatchIndexer {
    pub fn new(analyzer: Arc<Analyzer>, workers: usize) -> Self {
        let workers = workers.max(1);

        // Set number of threads for rayon
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build_global()
            .ok();

        BatchIndexer { analyzer, workers }
    }

    /// Build the positional inverted index for a whole batch.
    pub fn build(&self, batch: &NewsBatch) -> Result<PostingStore> {
        let mut store = PostingStore::with_universe(batch.doc_ids.clone());

        for (source, fragments) in &batch.fragments {
            let started = Instant::now();

            let locals: Result<Vec<PostingStore>> = partition(fragments, self.workers)
                .into_par_iter()
                .map(|sub_batch| self.index_fragments(sub_batch))
                .collect();

            // A failing worker aborts this source's build; the partial
            // locals are dropped here.
            let locals = locals.map_err(|err| {
                Error::new(
                    ErrorKind::Internal,
                    format!("index build for source {} failed: {}", source, err),
                )
            })?;

            for local in locals {
                store.merge_local(local);
            }

            info!(
                "indexed source {} ({} fragments) in {:.2}s",
                source,
                fragments.len(),
                started.elapsed().as_secs_f64()
            );
        }

        Ok(store)
    }

    fn index_fragments(&self, fragments: &[NewsFragment]) -> Result<PostingStore> {
        let mut local = PostingStore::new();

        for fragment in fragments {
            for article in &fragment.articles {
                let tokens = self.analyzer.analyze(&article.indexed_text());
                for token in tokens {
                    local.add_occurrence(&token.text, &article.doc_id, token.position);
                }
            }
        }

        Ok(local)
    }
}

/// Cut fragments into `parts` contiguous sub-batches; the remainder goes
/// to the last sub-batch.
fn partition(fragments: &[NewsFragment], parts: usize) -> Vec<&[NewsFragment]> {
    let batch_size = fragments.len() / parts;
    let mut batches = Vec::with_capacity(parts);

    for i in 0..parts {
        let start = i * batch_size;
        let end = if i == parts - 1 {
            fragments.len()
        } else {
            (i + 1) * batch_size
        };
        batches.push(&fragments[start..end]);
    }

    batches
}
