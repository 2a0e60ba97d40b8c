use std::fs;
use std::path::Path;
use crate::core::error::Result;

/// Load a newline-separated UTF-8 stop-word file. Loaded once at startup
/// and shared from there; analysis never re-reads it.
pub fn load_stop_words(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}
