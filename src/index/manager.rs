use chrono::NaiveDate;
use log::info;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use crate::analysis::analyzer::Analyzer;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::index::posting::PostingStore;
use crate::parallel::indexer::BatchIndexer;
use crate::storage::fragment::FragmentStore;
use crate::storage::index_file::{read_index_file, write_index_file};

pub const CHILD_INDEX_EXT: &str = "idx";

/// Builds child indexes per (source, date, fragment range) and merges them
/// into the global index. Child files already on disk are never rebuilt;
/// a failed run leaves them intact and the next run resumes after the
/// highest end index seen.
pub struct IndexManager {
    pub config: Config,
    pub analyzer: Arc<Analyzer>,
}

impl IndexManager {
    pub fn new(config: Config, analyzer: Arc<Analyzer>) -> Self {
        IndexManager { config, analyzer }
    }

    /// Child index file name: `{source}_{YYYY-MM-DD}_{start}_{end}.idx`.
    pub fn child_file_name(source: &str, date: NaiveDate, start: u32, end: u32) -> String {
        format!(
            "{}_{}_{}_{}.{}",
            source,
            date.format("%Y-%m-%d"),
            start,
            end,
            CHILD_INDEX_EXT
        )
    }

    /// The maximum end index among previously emitted child files for
    /// (source, date), if any.
    pub fn last_child_end(&self, source: &str, date: NaiveDate) -> Result<Option<u32>> {
        let pattern = Regex::new(&format!(
            "^{}_{}_([0-9]+)_([0-9]+)\\.{}$",
            regex::escape(source),
            date.format("%Y-%m-%d"),
            CHILD_INDEX_EXT
        ))?;

        let dir = &self.config.child_index_dir;
        if !dir.exists() {
            return Ok(None);
        }

        let mut last: Option<u32> = None;
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(caps) = pattern.captures(name) {
                let end = caps[2].parse::<u32>().map_err(|err| {
                    Error::new(ErrorKind::Parse, format!("child file {}: {}", name, err))
                })?;
                last = Some(last.map_or(end, |prev| prev.max(end)));
            }
        }

        Ok(last)
    }

    /// Build child index files for every not-yet-covered fragment of
    /// (source, date), `interval` fragments per child.
    pub fn build_children(
        &self,
        fragments: &dyn FragmentStore,
        source: &str,
        date: NaiveDate,
    ) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.config.child_index_dir)?;

        let last = self.last_child_end(source, date)?;
        let indices: Vec<u32> = fragments
            .list_indices(source, date)?
            .into_iter()
            .filter(|&index| last.is_none_or(|end| index > end))
            .collect();

        let indexer = BatchIndexer::new(self.analyzer.clone(), self.config.parallelism);
        let mut written = Vec::new();

        for chunk in indices.chunks(self.config.interval.max(1)) {
            let (first, end) = (chunk[0], chunk[chunk.len() - 1]);
            let batch = fragments.load_batch(source, date, first, end)?;
            let store = indexer.build(&batch)?;

            let path = self
                .config
                .child_index_dir
                .join(Self::child_file_name(source, date, first, end));
            write_index_file(&path, &store)?;
            info!(
                "wrote child index {} ({} terms, {} docs)",
                path.display(),
                store.term_count(),
                store.meta.document_size
            );
            written.push(path);
        }

        Ok(written)
    }

    /// Fold child index files into one global store. Children must cover
    /// disjoint doc_ids; collisions keep the first-merged posting.
    pub fn merge_global(&self, children: &[PathBuf]) -> Result<PostingStore> {
        let mut global = PostingStore::new();
        for path in children {
            let child = read_index_file(path)?;
            global.merge_child_into_global(child);
        }
        Ok(global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AttachmentField, NewsArticle, NewsFragment};
    use crate::storage::fragment::MemoryFragmentStore;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 16).unwrap()
    }

    fn fragment(index: u32, words: &str) -> NewsFragment {
        NewsFragment {
            source: "tele".to_string(),
            date: date(),
            index,
            articles: vec![NewsArticle {
                doc_id: index.to_string(),
                title: format!("headline {}", index),
                content: words.to_string(),
                date: "2024/02/16".to_string(),
                url: "http://news.example".to_string(),
                hypertext: AttachmentField::default(),
                figcaption: AttachmentField::default(),
            }],
        }
    }

    fn manager(dir: &std::path::Path, interval: usize) -> IndexManager {
        let config = Config {
            interval,
            parallelism: 2,
            child_index_dir: dir.to_path_buf(),
            ..Config::default()
        };
        let analyzer = Arc::new(Analyzer::with_options(Vec::new(), false, true).unwrap());
        IndexManager::new(config, analyzer)
    }

    #[test]
    fn children_are_chunked_by_interval() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 2);
        let store = MemoryFragmentStore::new(
            (0..5).map(|i| fragment(i, "quick brown fox")).collect(),
        );

        let written = manager.build_children(&store, "tele", date()).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "tele_2024-02-16_0_1.idx",
                "tele_2024-02-16_2_3.idx",
                "tele_2024-02-16_4_4.idx",
            ]
        );
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn resume_skips_fragments_already_covered() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 10);

        let first_run = MemoryFragmentStore::new(
            (0..3).map(|i| fragment(i, "quick")).collect(),
        );
        manager.build_children(&first_run, "tele", date()).unwrap();
        assert_eq!(manager.last_child_end("tele", date()).unwrap(), Some(2));

        // Two new crawler fragments appear; only those get a new child.
        let second_run = MemoryFragmentStore::new(
            (0..5).map(|i| fragment(i, "quick")).collect(),
        );
        let written = manager.build_children(&second_run, "tele", date()).unwrap();
        let names: Vec<&str> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["tele_2024-02-16_3_4.idx"]);
        assert_eq!(manager.last_child_end("tele", date()).unwrap(), Some(4));
    }

    #[test]
    fn foreign_files_are_ignored_when_resuming() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 10);
        fs::write(dir.path().join("bbc_2024-02-16_0_9.idx"), b"x").unwrap();
        fs::write(dir.path().join("tele_2024-02-17_0_9.idx"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        assert_eq!(manager.last_child_end("tele", date()).unwrap(), None);
    }

    #[test]
    fn merged_global_matches_a_single_build() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path(), 2);
        let fragments: Vec<NewsFragment> = vec![
            fragment(0, "quick brown fox"),
            fragment(1, "brown bears hibernate"),
            fragment(2, "every dog has its day"),
        ];
        let store = MemoryFragmentStore::new(fragments.clone());

        let children = manager.build_children(&store, "tele", date()).unwrap();
        let global = manager.merge_global(&children).unwrap();

        let whole_batch = store.load_batch("tele", date(), 0, 2).unwrap();
        let direct = BatchIndexer::new(manager.analyzer.clone(), 2)
            .build(&whole_batch)
            .unwrap();

        assert_eq!(global.index, direct.index);
        let mut merged_ids = global.meta.doc_ids.clone();
        merged_ids.sort();
        assert_eq!(merged_ids, vec!["0", "1", "2"]);
    }
}
