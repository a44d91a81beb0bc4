pub mod content;
pub mod domain;
pub mod metadata;
pub mod title;

use crate::filter::WordFilter;
use once_cell::sync::Lazy;
use regex::Regex;
use select::document::Document;
use std::collections::HashSet;

static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z][a-zA-Z0-9]*\b").expect("word pattern"));

/// Settings shared by every extractor. Fixed for the whole run.
#[derive(Clone, Copy, Debug)]
pub struct ExtractionConfig {
    pub min_word_length: usize,
    pub max_word_length: usize,
    pub min_frequency: usize,
    pub filter_ips: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            min_word_length: 3,
            max_word_length: 50,
            min_frequency: 2,
            filter_ips: true,
        }
    }
}

impl ExtractionConfig {
    pub fn word_filter(&self) -> WordFilter {
        WordFilter {
            min_word_length: self.min_word_length,
            max_word_length: self.max_word_length,
            filter_ips: self.filter_ips,
        }
    }
}

/// Letter-leading alphanumeric tokens, case preserved.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    WORD_PATTERN.find_iter(text).map(|m| m.as_str())
}

/// Tokenizes `text` and keeps the lowercased tokens that pass `filter`.
pub(crate) fn filtered_words(text: &str, filter: &WordFilter) -> HashSet<String> {
    tokenize(text)
        .filter(|word| filter.is_valid_word(word))
        .map(|word| word.to_lowercase())
        .collect()
}

pub fn get_words_from_html(html: &str, config: &ExtractionConfig) -> HashSet<String> {
    //! Parses a fetched page once and runs the title, content and metadata
    //! extractors over it.
    let document = Document::from(html);
    let mut words = title::extract(&document, config);
    words.extend(content::extract(&document, config));
    words.extend(metadata::extract(&document, config));
    words
}
