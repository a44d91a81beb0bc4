use super::{filtered_words, ExtractionConfig};
use select::document::Document;
use select::node::Node;
use select::predicate::{Element, Name};
use std::collections::HashSet;

const META_ATTRS: [&str; 3] = ["content", "name", "property"];
const LABELLED_TAGS: [&str; 4] = ["img", "area", "input", "a"];
const LABEL_ATTRS: [&str; 2] = ["alt", "title"];
const LINKING_TAGS: [&str; 4] = ["a", "img", "link", "script"];
const LINK_ATTRS: [&str; 2] = ["href", "src"];

/// Link targets are noisy, so their words need at least this many characters.
const MIN_LINK_WORD_LENGTH: usize = 4;

pub fn extract(document: &Document, config: &ExtractionConfig) -> HashSet<String> {
    let filter = config.word_filter();
    let mut words = HashSet::new();

    for meta in document.find(Name("meta")) {
        words.extend(attr_words(meta, &META_ATTRS, |text| {
            filtered_words(text, &filter)
        }));
    }

    for node in elements(document, &LABELLED_TAGS) {
        words.extend(attr_words(node, &LABEL_ATTRS, |text| {
            filtered_words(text, &filter)
        }));
    }

    for node in elements(document, &LINKING_TAGS) {
        words.extend(attr_words(node, &LINK_ATTRS, |text| {
            filtered_words(text, &filter)
                .into_iter()
                .filter(|x| x.chars().count() >= MIN_LINK_WORD_LENGTH)
                .collect()
        }));
    }

    words
}

fn elements<'a>(
    document: &'a Document,
    names: &'a [&'a str],
) -> impl Iterator<Item = Node<'a>> + 'a {
    document
        .find(Element)
        .filter(move |node| node.name().map_or(false, |name| names.contains(&name)))
}

fn attr_words<F>(node: Node, attrs: &[&str], words_of: F) -> HashSet<String>
where
    F: Fn(&str) -> HashSet<String>,
{
    attrs
        .iter()
        .filter_map(|attr| node.attr(attr))
        .flat_map(|value| words_of(&value.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen_hashset(arr: &[&str]) -> HashSet<String> {
        arr.iter().map(|x| x.to_string()).collect()
    }

    fn words(html: &str) -> HashSet<String> {
        extract(&Document::from(html), &ExtractionConfig::default())
    }

    #[test]
    fn meta_attributes() {
        let html = r#"<head>
            <meta name="generator" content="WordPress 6.4">
            <meta property="og:site_name" content="Acme Storefront">
            <meta charset="utf-8">
        </head>"#;
        assert_eq!(
            words(html),
            gen_hashset(&["generator", "wordpress", "acme", "storefront"])
        );
    }

    #[test]
    fn alt_and_title_attributes() {
        let html = r#"<body>
            <img alt="Company Logo" src="x.png">
            <input type="text" title="Employee ID">
            <a title="Payroll">x</a>
            <div title="Ignored Division"></div>
        </body>"#;
        assert_eq!(
            words(html),
            gen_hashset(&["company", "logo", "employee", "payroll"])
        );
    }

    #[test]
    fn link_targets_need_longer_words() {
        let html = r#"<body>
            <a href="https://cdn.example.com/api/v1/uploads/img.png">x</a>
            <script src="/static/js/app.js"></script>
            <link href="/assets/theme.css" rel="stylesheet">
        </body>"#;
        assert_eq!(
            words(html),
            gen_hashset(&["example", "uploads", "static", "assets", "theme"])
        );
    }
}
