use chrono::NaiveDate;
use log::warn;
use serde::{Serialize, Deserialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Hypertext/figcaption payloads arrive either as a parsed map or as a
/// string that still needs a JSON parse (single-quoted in the wild).
/// Normalized at the boundary; the indexer only sees the map form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttachmentField {
    Map(HashMap<String, String>),
    Raw(String),
}

impl Default for AttachmentField {
    fn default() -> Self {
        AttachmentField::Map(HashMap::new())
    }
}

impl AttachmentField {
    pub fn normalize(self) -> HashMap<String, String> {
        match self {
            AttachmentField::Map(map) => map,
            AttachmentField::Raw(text) => {
                match serde_json::from_str(&text.replace('\'', "\"")) {
                    Ok(map) => map,
                    Err(err) => {
                        warn!("unparseable attachment field {:?}: {}", text, err);
                        HashMap::new()
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub doc_id: String,
    pub title: String,
    pub content: String,
    pub date: String,  // YYYY/MM/DD
    pub url: String,
    #[serde(default)]
    pub hypertext: AttachmentField,
    #[serde(default)]
    pub figcaption: AttachmentField,
}

impl NewsArticle {
    /// Canonical text used for position numbering.
    pub fn indexed_text(&self) -> String {
        format!("{}\n{}", self.title, self.content)
    }
}

/// A single crawler fragment (one file of articles).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsFragment {
    pub source: String,
    pub date: NaiveDate,
    pub index: u32,
    pub articles: Vec<NewsArticle>,
}

/// A batch of fragments grouped by source, with the document universe
/// assembled up front so builder workers never contend on it.
#[derive(Debug, Clone, Default)]
pub struct NewsBatch {
    pub doc_ids: Vec<String>,
    pub indices: HashMap<String, Vec<u32>>,
    pub fragments: HashMap<String, Vec<NewsFragment>>,
}

impl NewsBatch {
    pub fn from_fragments(fragments: Vec<NewsFragment>) -> Self {
        let mut batch = NewsBatch::default();
        for fragment in fragments {
            for article in &fragment.articles {
                batch.doc_ids.push(article.doc_id.clone());
            }
            batch.indices
                .entry(fragment.source.clone())
                .or_default()
                .push(fragment.index);
            batch.fragments
                .entry(fragment.source.clone())
                .or_default()
                .push(fragment);
        }
        batch
    }

    pub fn document_count(&self) -> usize {
        self.doc_ids.len()
    }
}

/// Doc IDs are strings on the wire but ordered as integers; non-numeric
/// IDs sort after numeric ones, by byte value.
pub fn compare_doc_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
