use super::{tokenize, ExtractionConfig};
use select::document::Document;
use select::node::Node;
use select::predicate::Text;
use std::collections::{HashMap, HashSet};

const HIDDEN_TAGS: [&str; 5] = ["script", "style", "meta", "link", "noscript"];

pub fn extract(document: &Document, config: &ExtractionConfig) -> HashSet<String> {
    //! Words repeated at least `min_frequency` times in the visible text.
    let text = visible_text(document).to_lowercase();
    if text.is_empty() {
        return HashSet::new();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in tokenize(&text) {
        *counts.entry(word).or_insert(0) += 1;
    }

    let filter = config.word_filter();
    counts
        .into_iter()
        .filter(|(word, count)| *count >= config.min_frequency && filter.is_valid_word(word))
        .map(|(word, _)| word.to_string())
        .collect()
}

/// Trimmed text nodes outside non-content elements, joined by single spaces.
pub fn visible_text(document: &Document) -> String {
    document
        .find(Text)
        .filter(|node| !is_hidden(*node))
        .filter_map(|node| node.as_text())
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_hidden(node: Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if let Some(name) = parent.name() {
            if HIDDEN_TAGS.contains(&name) {
                return true;
            }
        }
        current = parent.parent();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(html: &str, config: &ExtractionConfig) -> HashSet<String> {
        extract(&Document::from(html), config)
    }

    #[test]
    fn frequent_words_only() {
        let mut html = String::from("<html><body>");
        for _ in 0..3 {
            html.push_str("<p>dashboard</p>");
        }
        for _ in 0..50 {
            html.push_str("<span>a</span>");
        }
        html.push_str("<p>incidental</p></body></html>");

        let ans: HashSet<String> = ["dashboard"].iter().map(|x| x.to_string()).collect();
        assert_eq!(words(&html, &ExtractionConfig::default()), ans);
    }

    #[test]
    fn counts_are_case_insensitive() {
        let html = "<body><h1>Invoices</h1><p>invoices due</p></body>";
        assert!(words(html, &ExtractionConfig::default()).contains("invoices"));
    }

    #[test]
    fn min_frequency_threshold() {
        let html = "<body>archive archive backup</body>";
        let config = ExtractionConfig {
            min_frequency: 1,
            ..ExtractionConfig::default()
        };
        let ans: HashSet<String> = ["archive", "backup"].iter().map(|x| x.to_string()).collect();
        assert_eq!(words(html, &config), ans);

        let config = ExtractionConfig {
            min_frequency: 3,
            ..ExtractionConfig::default()
        };
        assert!(words(html, &config).is_empty());
    }

    #[test]
    fn skips_non_content_nodes() {
        let html = "<html><head>
                        <style>.widget { color: red } .widget {}</style>
                        <script>widget(); widget();</script>
                    </head>
                    <body>
                        <noscript>widget widget</noscript>
                        <p>uploads</p><p>uploads</p>
                    </body></html>";
        let ans: HashSet<String> = ["uploads"].iter().map(|x| x.to_string()).collect();
        assert_eq!(words(html, &ExtractionConfig::default()), ans);
    }

    #[test]
    fn visible_text_is_joined() {
        let document = Document::from("<body><p> alpha </p>\n<p>beta</p><script>x</script></body>");
        assert_eq!(visible_text(&document), "alpha beta");
    }
}
