use super::ExtractionConfig;
use crate::filter::WordFilter;
use std::collections::HashSet;
use tracing::debug;
use url::{Host, Url};

const GENERIC_TLDS: [&str; 6] = ["com", "org", "net", "edu", "gov", "mil"];

/// A hostname split along its public suffix.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DomainParts {
    pub subdomain: String,
    pub domain: String,
    pub suffix: String,
}

impl DomainParts {
    pub fn from_host(host: &str) -> Self {
        //! `mail.example.co.uk` → (`mail`, `example`, `co.uk`).
        //! Hosts without a known suffix keep their last label as the domain.
        let host = host.trim_end_matches('.').to_lowercase();
        let suffix = match psl::suffix(host.as_bytes()) {
            Some(s) if s.is_known() => String::from_utf8_lossy(s.as_bytes()).into_owned(),
            _ => String::new(),
        };

        let rest = if suffix.is_empty() {
            host.as_str()
        } else if host == suffix {
            ""
        } else {
            host.strip_suffix(suffix.as_str())
                .and_then(|x| x.strip_suffix('.'))
                .unwrap_or("")
        };

        let (subdomain, domain) = match rest.rfind('.') {
            Some(i) => (&rest[..i], &rest[i + 1..]),
            None => ("", rest),
        };

        DomainParts {
            subdomain: subdomain.to_string(),
            domain: domain.to_string(),
            suffix,
        }
    }
}

pub fn extract(url: &str, config: &ExtractionConfig) -> HashSet<String> {
    let parsed = match Url::parse(url) {
        Ok(x) => x,
        Err(e) => {
            debug!("Error parsing domain from {}: {}", url, e);
            return HashSet::new();
        }
    };

    let host = match parsed.host() {
        Some(Host::Domain(x)) => x.to_string(),
        // Raw IP literals carry no vocabulary.
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => return HashSet::new(),
        None => {
            debug!("Error parsing domain from {}: no host", url);
            return HashSet::new();
        }
    };

    let filter = config.word_filter();
    let parts = DomainParts::from_host(&host);
    let mut words = HashSet::new();

    for part in [&parts.subdomain, &parts.domain] {
        words.extend(split_labels(part, &filter));
    }

    words.extend(
        split_labels(&parts.suffix, &filter)
            .into_iter()
            .filter(|x| !GENERIC_TLDS.contains(&x.as_str())),
    );

    words
}

fn split_labels(part: &str, filter: &WordFilter) -> Vec<String> {
    part.split(&['.', '-'][..])
        .filter(|x| !x.is_empty() && filter.is_valid_word(x))
        .map(|x| x.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen_hashset(arr: &[&str]) -> HashSet<String> {
        arr.iter().map(|x| x.to_string()).collect()
    }

    fn words(url: &str) -> HashSet<String> {
        extract(url, &ExtractionConfig::default())
    }

    #[test]
    fn multi_label_suffix() {
        assert_eq!(
            DomainParts::from_host("mail.example.co.uk"),
            DomainParts {
                subdomain: "mail".to_string(),
                domain: "example".to_string(),
                suffix: "co.uk".to_string(),
            }
        );
        assert_eq!(
            words("https://mail.example.co.uk/path"),
            gen_hashset(&["mail", "example"])
        );
    }

    #[test]
    fn subdomains_and_hyphens() {
        assert_eq!(
            words("https://dev-portal.api.acme-corp.com/login"),
            gen_hashset(&["dev", "portal", "api", "acme", "corp"])
        );
    }

    #[test]
    fn non_generic_suffix_kept() {
        assert_eq!(
            words("https://shop.example.travel"),
            gen_hashset(&["shop", "example", "travel"])
        );
        assert_eq!(words("http://example.org"), gen_hashset(&["example"]));
    }

    #[test]
    fn generic_labels_dropped_from_multi_label_suffix() {
        assert_eq!(words("https://www.hmrc.gov.uk/"), gen_hashset(&["hmrc"]));
        assert_eq!(
            words("https://portal.unimelb.edu.au/"),
            gen_hashset(&["portal", "unimelb"])
        );
        assert_eq!(
            words("https://library.example.org.uk/"),
            gen_hashset(&["library", "example"])
        );
    }

    #[test]
    fn unknown_suffix_is_domain() {
        assert_eq!(
            DomainParts::from_host("intranet.corp"),
            DomainParts {
                subdomain: "intranet".to_string(),
                domain: "corp".to_string(),
                suffix: String::new(),
            }
        );
    }

    #[test]
    fn ip_hosts_yield_nothing() {
        assert!(words("http://192.168.0.10/admin").is_empty());
        assert!(words("http://[::1]:8080/").is_empty());
    }

    #[test]
    fn parse_failures_yield_nothing() {
        assert!(words("not a url").is_empty());
        assert!(words("https://").is_empty());
    }

    #[test]
    fn stop_words_and_short_labels_dropped() {
        assert_eq!(words("https://www.example.com"), gen_hashset(&["example"]));
        assert!(words("https://localhost:3000").is_empty());
    }
}
