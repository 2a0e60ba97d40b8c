use log::warn;
use std::fs;
use std::io::Write;
use std::path::Path;
use crate::core::error::Result;
use crate::scoring::scorer::RankedDoc;

/// Read a query file: one query per line, `<queryId> <queryText>`.
/// Blank and malformed lines are skipped with a warning.
pub fn read_query_file(path: &Path) -> Result<Vec<(String, String)>> {
    let content = fs::read_to_string(path)?;
    let mut queries = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match line.split_once(' ') {
            Some((query_id, query_text)) if !query_text.trim().is_empty() => {
                queries.push((query_id.to_string(), query_text.trim().to_string()));
            }
            _ => warn!("skipping malformed query line {:?}", line),
        }
    }

    Ok(queries)
}

/// Boolean results: `<queryId>,<docId>` per retrieved document, docIds
/// already in ascending numeric order per query.
pub fn write_boolean_results(path: &Path, results: &[(String, Vec<String>)]) -> Result<()> {
    let mut file = fs::File::create(path)?;
    for (query_id, doc_ids) in results {
        for doc_id in doc_ids {
            writeln!(file, "{},{}", query_id, doc_id)?;
        }
    }
    Ok(())
}

/// Ranked results: `<queryId>,<docId>,<score>` with the score to four
/// decimal places.
pub fn write_ranked_results(path: &Path, results: &[(String, Vec<RankedDoc>)]) -> Result<()> {
    let mut file = fs::File::create(path)?;
    for (query_id, docs) in results {
        for doc in docs {
            writeln!(file, "{},{},{:.4}", query_id, doc.doc_id, doc.score)?;
        }
    }
    Ok(())
}
