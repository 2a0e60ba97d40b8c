use std::collections::HashSet;
use crate::analysis::analyzer::Analyzer;
use crate::core::types::compare_doc_ids;
use crate::index::posting::PostingStore;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedDoc {
    pub doc_id: String,
    pub score: f64,
}

/// TF-IDF scorer for free-text queries
///
/// `score(d) = Σ (1 + log10 tf(t,d)) · log10(N / df(t))` over the query
/// terms present in the index. Candidates are the union of the terms'
/// posting docs; ordering is `(-score, docIdAsInteger)` and therefore
/// total and reproducible.
pub struct TfIdfScorer {
    pub max_results: usize,
}

impl TfIdfScorer {
    pub fn new(max_results: usize) -> Self {
        TfIdfScorer { max_results }
    }

    pub fn rank(&self, store: &PostingStore, analyzer: &Analyzer, query: &str) -> Vec<RankedDoc> {
        let terms = analyzer.terms(query);

        let mut candidates: HashSet<&String> = HashSet::new();
        for term in &terms {
            if let Some(record) = store.postings(term) {
                candidates.extend(record.keys());
            }
        }

        let mut ranked: Vec<RankedDoc> = candidates
            .into_iter()
            .map(|doc_id| RankedDoc {
                doc_id: doc_id.clone(),
                score: Self::score(store, &terms, doc_id),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| compare_doc_ids(&a.doc_id, &b.doc_id))
        });
        ranked.truncate(self.max_results);
        ranked
    }

    /// Terms absent from the index, or absent from the document,
    /// contribute zero.
    fn score(store: &PostingStore, terms: &[String], doc_id: &str) -> f64 {
        let total_docs = store.meta.document_size as f64;
        let mut score = 0.0;

        for term in terms {
            let Some(record) = store.postings(term) else { continue };
            let Some(positions) = record.get(doc_id) else { continue };

            let tf = 1.0 + (positions.len() as f64).log10();
            let idf = (total_docs / record.len() as f64).log10();
            score += tf * idf;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pre-analyzed three-document corpus; doc 3 carries `dog` twice.
    fn store() -> PostingStore {
        let mut store = PostingStore::with_universe(vec![
            "1".to_string(),
            "2".to_string(),
            "3".to_string(),
        ]);
        for (term, doc_id, position) in [
            ("quick", "1", 1),
            ("brown", "1", 2),
            ("dog", "1", 6),
            ("quick", "2", 1),
            ("brown", "2", 3),
            ("dog", "3", 1),
            ("dog", "3", 3),
        ] {
            store.add_occurrence(term, doc_id, position);
        }
        store
    }

    fn analyzer() -> Analyzer {
        Analyzer::with_options(Vec::new(), false, true).unwrap()
    }

    #[test]
    fn more_matching_terms_rank_higher() {
        let ranked = TfIdfScorer::new(150).rank(&store(), &analyzer(), "quick brown dog");

        let order: Vec<&str> = ranked.iter().map(|d| d.doc_id.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "3"]);

        // d1 matches all three terms once, each with df = 2 out of N = 3.
        let expected_d1 = 3.0 * (3.0f64 / 2.0).log10();
        assert!((ranked[0].score - expected_d1).abs() < 1e-9);

        // d3 matches only dog, but twice.
        let expected_d3 = (1.0 + 2.0f64.log10()) * (3.0f64 / 2.0).log10();
        assert!((ranked[2].score - expected_d3).abs() < 1e-9);
    }

    #[test]
    fn absent_terms_contribute_zero() {
        let with_noise = TfIdfScorer::new(150).rank(&store(), &analyzer(), "dog unicorn");
        let without = TfIdfScorer::new(150).rank(&store(), &analyzer(), "dog");
        assert_eq!(with_noise, without);
    }

    #[test]
    fn ties_break_by_numeric_doc_id() {
        let ranked = TfIdfScorer::new(150).rank(&store(), &analyzer(), "quick");
        let order: Vec<&str> = ranked.iter().map(|d| d.doc_id.as_str()).collect();
        assert_eq!(order, vec!["1", "2"]);
        assert_eq!(ranked[0].score, ranked[1].score);
    }

    #[test]
    fn result_list_is_capped() {
        let ranked = TfIdfScorer::new(1).rank(&store(), &analyzer(), "quick brown dog");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].doc_id, "1");
    }

    #[test]
    fn unknown_query_ranks_nothing() {
        assert!(TfIdfScorer::new(150)
            .rank(&store(), &analyzer(), "unicorn griffin")
            .is_empty());
    }
}
