use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::lowercase::LowercaseFilter;
use crate::analysis::filters::stemmer::StemmerFilter;
use crate::analysis::filters::stopword::StopWordFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{Tokenizer, WordTokenizer};
use crate::core::config::Config;
use crate::core::error::Result;

/// Text analysis pipeline
///
/// Positions are assigned 1-based over the stream that survives filtering,
/// so stop-word removal closes the gaps. Index and query sides must use the
/// same pipeline for phrase and proximity positions to line up.
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
    pub name: String,
}

impl Analyzer {
    pub fn new(name: String, tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            filters: Vec::new(),
            name,
        }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        for (i, token) in tokens.iter_mut().enumerate() {
            token.position = (i + 1) as u32;
        }

        tokens
    }

    /// Analyzed terms without positions, for query operands.
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.analyze(text).into_iter().map(|t| t.text).collect()
    }

    /// Lowercase + configured stopping/stemming over a custom stop-word list.
    pub fn with_options(stop_words: Vec<String>, stopping: bool, stemming: bool) -> Result<Self> {
        let mut analyzer = Analyzer::new(
            "news".to_string(),
            Box::new(WordTokenizer::new()?),
        )
        .add_filter(Box::new(LowercaseFilter));

        if stopping {
            analyzer = analyzer.add_filter(Box::new(StopWordFilter::new(stop_words)));
        }
        if stemming {
            analyzer = analyzer.add_filter(Box::new(StemmerFilter::english()));
        }

        Ok(analyzer)
    }

    /// The pipeline for a loaded stop-word list and the config's
    /// stopping/stemming flags; index and query sides share one instance.
    pub fn from_config(config: &Config, stop_words: Vec<String>) -> Result<Self> {
        Analyzer::with_options(stop_words, config.stopping, config.stemming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_words() -> Vec<String> {
        ["the", "over", "in", "its", "has", "every"]
            .iter()
            .map(|w| w.to_string())
            .collect()
    }

    #[test]
    fn positions_close_over_removed_stop_words() {
        let analyzer = Analyzer::with_options(stop_words(), true, true).unwrap();
        let tokens = analyzer.analyze("The Quick Brown Fox\nJumps over the lazy dog.");

        let stream: Vec<(String, u32)> =
            tokens.into_iter().map(|t| (t.text, t.position)).collect();
        assert_eq!(
            stream,
            vec![
                ("quick".to_string(), 1),
                ("brown".to_string(), 2),
                ("fox".to_string(), 3),
                ("jump".to_string(), 4),
                ("lazi".to_string(), 5),
                ("dog".to_string(), 6),
            ]
        );
    }

    #[test]
    fn stemming_folds_inflections() {
        let analyzer = Analyzer::with_options(Vec::new(), false, true).unwrap();
        assert_eq!(analyzer.terms("bears hibernate"), vec!["bear", "hibern"]);
    }

    #[test]
    fn options_disable_stages() {
        let plain = Analyzer::with_options(stop_words(), false, false).unwrap();
        assert_eq!(
            plain.terms("The Jumps"),
            vec!["the".to_string(), "jumps".to_string()]
        );

        let stopped = Analyzer::with_options(stop_words(), true, false).unwrap();
        assert_eq!(stopped.terms("The Jumps"), vec!["jumps".to_string()]);
    }

    #[test]
    fn config_flags_drive_the_pipeline() {
        let config = Config {
            stopping: true,
            stemming: false,
            ..Config::default()
        };
        let analyzer = Analyzer::from_config(&config, stop_words()).unwrap();
        assert_eq!(analyzer.terms("The Jumps"), vec!["jumps".to_string()]);
    }

    #[test]
    fn analysis_is_deterministic() {
        let analyzer = Analyzer::with_options(stop_words(), true, true).unwrap();
        let first = analyzer.analyze("Every dog has its day.");
        let second = analyzer.analyze("Every dog has its day.");
        assert_eq!(first, second);
    }
}
