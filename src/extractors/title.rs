use super::{filtered_words, ExtractionConfig};
use select::{document::Document, predicate::Name};
use std::collections::HashSet;

pub fn extract(document: &Document, config: &ExtractionConfig) -> HashSet<String> {
    match document.find(Name("title")).next() {
        Some(title) => filtered_words(title.text().trim(), &config.word_filter()),
        None => HashSet::new(),
    }
}
