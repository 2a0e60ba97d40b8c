use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{NewsBatch, NewsFragment};

/// External fragment provider: the crawlers' output as the core sees it.
pub trait FragmentStore: Send + Sync {
    /// All fragment indices known for (source, date), ascending.
    fn list_indices(&self, source: &str, date: NaiveDate) -> Result<Vec<u32>>;

    /// Load the fragments with indices in `[start, end]` as one batch.
    fn load_batch(&self, source: &str, date: NaiveDate, start: u32, end: u32)
        -> Result<NewsBatch>;
}

/// Directory of fragment files named `{source}_{YYYY-MM-DD}_{index}.json`.
pub struct JsonFragmentStore {
    pub root: PathBuf,
}

impl JsonFragmentStore {
    pub fn new(root: PathBuf) -> Self {
        JsonFragmentStore { root }
    }

    fn fragment_path(&self, source: &str, date: NaiveDate, index: u32) -> PathBuf {
        self.root
            .join(format!("{}_{}_{}.json", source, date.format("%Y-%m-%d"), index))
    }

    fn read_fragment(&self, source: &str, date: NaiveDate, index: u32) -> Result<NewsFragment> {
        let path = self.fragment_path(source, date, index);
        let data = fs::read_to_string(&path).map_err(|err| {
            Error::new(
                ErrorKind::Io,
                format!("fragment {}: {}", path.display(), err),
            )
        })?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl FragmentStore for JsonFragmentStore {
    fn list_indices(&self, source: &str, date: NaiveDate) -> Result<Vec<u32>> {
        let pattern = Regex::new(&format!(
            "^{}_{}_([0-9]+)\\.json$",
            regex::escape(source),
            date.format("%Y-%m-%d")
        ))?;

        let mut indices = Vec::new();
        if !self.root.exists() {
            return Ok(indices);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(caps) = pattern.captures(name) {
                let index = caps[1].parse::<u32>().map_err(|err| {
                    Error::new(ErrorKind::Parse, format!("fragment name {}: {}", name, err))
                })?;
                indices.push(index);
            }
        }

        indices.sort_unstable();
        Ok(indices)
    }

    fn load_batch(
        &self,
        source: &str,
        date: NaiveDate,
        start: u32,
        end: u32,
    ) -> Result<NewsBatch> {
        let mut fragments = Vec::new();
        for index in self.list_indices(source, date)? {
            if index >= start && index <= end {
                fragments.push(self.read_fragment(source, date, index)?);
            }
        }
        Ok(NewsBatch::from_fragments(fragments))
    }
}

/// In-memory store, for tests and small corpora.
pub struct MemoryFragmentStore {
    pub fragments: Vec<NewsFragment>,
}

impl MemoryFragmentStore {
    pub fn new(fragments: Vec<NewsFragment>) -> Self {
        MemoryFragmentStore { fragments }
    }
}

impl FragmentStore for MemoryFragmentStore {
    fn list_indices(&self, source: &str, date: NaiveDate) -> Result<Vec<u32>> {
        let mut indices: Vec<u32> = self
            .fragments
            .iter()
            .filter(|f| f.source == source && f.date == date)
            .map(|f| f.index)
            .collect();
        indices.sort_unstable();
        Ok(indices)
    }

    fn load_batch(
        &self,
        source: &str,
        date: NaiveDate,
        start: u32,
        end: u32,
    ) -> Result<NewsBatch> {
        let mut selected: Vec<NewsFragment> = self
            .fragments
            .iter()
            .filter(|f| {
                f.source == source && f.date == date && f.index >= start && f.index <= end
            })
            .cloned()
            .collect();
        selected.sort_by_key(|f| f.index);
        Ok(NewsBatch::from_fragments(selected))
    }
}
