use log::warn;
use serde::{Serialize, Deserialize};
use std::collections::{HashMap, HashSet};
use crate::core::types::compare_doc_ids;

/// Index metadata: the covered document count and the ordered universe
/// used as the complement target for NOT.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreMeta {
    pub document_size: usize,
    pub doc_ids: Vec<String>,
}

/// Positional inverted index: term -> doc_id -> ascending positions.
///
/// Built monotonically, frozen before serialization, immutable after load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingStore {
    pub meta: StoreMeta,
    pub index: HashMap<String, HashMap<String, Vec<u32>>>,
}

impl PostingStore {
    pub fn new() -> Self {
        PostingStore::default()
    }

    pub fn with_universe(doc_ids: Vec<String>) -> Self {
        PostingStore {
            meta: StoreMeta {
                document_size: doc_ids.len(),
                doc_ids,
            },
            index: HashMap::new(),
        }
    }

    /// Append a position for (term, doc_id). Caller guarantees ascending
    /// order per (term, doc_id).
    pub fn add_occurrence(&mut self, term: &str, doc_id: &str, position: u32) {
        self.index
            .entry(term.to_string())
            .or_default()
            .entry(doc_id.to_string())
            .or_default()
            .push(position);
    }

    pub fn term_count(&self) -> usize {
        self.index.len()
    }

    pub fn doc_frequency(&self, term: &str) -> usize {
        self.index.get(term).map_or(0, |record| record.len())
    }

    pub fn postings(&self, term: &str) -> Option<&HashMap<String, Vec<u32>>> {
        self.index.get(term)
    }

    /// Merge a worker-local store built over a disjoint doc range.
    /// Overlap on (term, doc_id) is an indexer error: the lists are still
    /// concatenated, with a warning.
    pub fn merge_local(&mut self, other: PostingStore) {
        for (term, record) in other.index {
            let target = self.index.entry(term).or_default();
            for (doc_id, mut positions) in record {
                match target.get_mut(&doc_id) {
                    Some(existing) => {
                        warn!("local stores overlap on doc {}", doc_id);
                        existing.append(&mut positions);
                    }
                    None => {
                        target.insert(doc_id, positions);
                    }
                }
            }
        }
    }

    /// Merge a child index into this global one. Children must cover
    /// disjoint doc_ids; a colliding (term, doc_id) is a protocol violation
    /// and the existing global posting is retained.
    pub fn merge_child_into_global(&mut self, child: PostingStore) {
        for (term, record) in child.index {
            match self.index.get_mut(&term) {
                Some(target) => {
                    for (doc_id, positions) in record {
                        if target.contains_key(&doc_id) {
                            warn!(
                                "trying to add new documents under the same doc ID: {} {}",
                                term, doc_id
                            );
                        } else {
                            target.insert(doc_id, positions);
                        }
                    }
                }
                None => {
                    self.index.insert(term, record);
                }
            }
        }

        let known: HashSet<&String> = self.meta.doc_ids.iter().collect();
        let added: Vec<String> = child
            .meta
            .doc_ids
            .into_iter()
            .filter(|id| !known.contains(id))
            .collect();
        self.meta.doc_ids.extend(added);
        self.meta.document_size = self.meta.doc_ids.len();
    }

    /// Terms in lexicographic byte order, doc_ids in ascending numeric
    /// order within each term.
    pub fn iter_sorted(&self) -> Vec<(&String, Vec<(&String, &Vec<u32>)>)> {
        let mut terms: Vec<&String> = self.index.keys().collect();
        terms.sort();

        terms
            .into_iter()
            .map(|term| {
                let mut postings: Vec<(&String, &Vec<u32>)> =
                    self.index[term].iter().collect();
                postings.sort_by(|a, b| compare_doc_ids(a.0, b.0));
                (term, postings)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occurrences_accumulate_in_order() {
        let mut store = PostingStore::new();
        store.add_occurrence("dog", "1", 6);
        store.add_occurrence("dog", "3", 1);
        store.add_occurrence("dog", "3", 3);

        assert_eq!(store.index["dog"]["1"], vec![6]);
        assert_eq!(store.index["dog"]["3"], vec![1, 3]);
        assert_eq!(store.doc_frequency("dog"), 2);
        assert_eq!(store.doc_frequency("cat"), 0);
    }

    #[test]
    fn merge_local_combines_disjoint_docs() {
        let mut left = PostingStore::new();
        left.add_occurrence("quick", "1", 1);

        let mut right = PostingStore::new();
        right.add_occurrence("quick", "2", 1);
        right.add_occurrence("news", "2", 2);

        left.merge_local(right);
        assert_eq!(left.index["quick"].len(), 2);
        assert_eq!(left.index["news"]["2"], vec![2]);
    }

    #[test]
    fn merge_local_concatenates_on_overlap() {
        let mut left = PostingStore::new();
        left.add_occurrence("dog", "1", 2);

        let mut right = PostingStore::new();
        right.add_occurrence("dog", "1", 5);

        left.merge_local(right);
        assert_eq!(left.index["dog"]["1"], vec![2, 5]);
    }

    #[test]
    fn global_merge_retains_existing_posting_on_conflict() {
        let mut global = PostingStore::with_universe(vec!["42".to_string()]);
        global.add_occurrence("fox", "42", 1);

        let mut child = PostingStore::with_universe(vec!["42".to_string()]);
        child.add_occurrence("fox", "42", 9);

        global.merge_child_into_global(child);
        assert_eq!(global.index["fox"]["42"], vec![1]);
        assert_eq!(global.meta.doc_ids, vec!["42"]);
        assert_eq!(global.meta.document_size, 1);
    }

    #[test]
    fn global_merge_extends_universe() {
        let mut global = PostingStore::with_universe(vec!["1".to_string()]);
        global.add_occurrence("quick", "1", 1);

        let mut child = PostingStore::with_universe(vec!["2".to_string(), "3".to_string()]);
        child.add_occurrence("quick", "2", 1);
        child.add_occurrence("dog", "3", 4);

        global.merge_child_into_global(child);
        assert_eq!(global.meta.doc_ids, vec!["1", "2", "3"]);
        assert_eq!(global.meta.document_size, 3);
        assert_eq!(global.index["quick"].len(), 2);
        assert_eq!(global.index["dog"]["3"], vec![4]);
    }

    #[test]
    fn merge_is_associative_on_disjoint_stores() {
        let store = |doc: &str, pos: u32| {
            let mut s = PostingStore::with_universe(vec![doc.to_string()]);
            s.add_occurrence("term", doc, pos);
            s
        };

        let mut left = store("1", 1);
        left.merge_child_into_global(store("2", 2));
        left.merge_child_into_global(store("3", 3));

        let mut bc = store("2", 2);
        bc.merge_child_into_global(store("3", 3));
        let mut right = store("1", 1);
        right.merge_child_into_global(bc);

        assert_eq!(left, right);
    }

    #[test]
    fn sorted_iteration_orders_terms_and_docs() {
        let mut store = PostingStore::new();
        store.add_occurrence("zebra", "2", 1);
        store.add_occurrence("apple", "10", 1);
        store.add_occurrence("apple", "9", 4);

        let sorted = store.iter_sorted();
        assert_eq!(sorted[0].0, "apple");
        assert_eq!(sorted[1].0, "zebra");

        let apple_docs: Vec<&str> =
            sorted[0].1.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(apple_docs, vec!["9", "10"]);
    }
}
