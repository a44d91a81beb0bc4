use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::net::{Ipv4Addr, Ipv6Addr};

static IPV4_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("ipv4 pattern"));

static IPV6_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9a-fA-F]{0,4}:){2,7}[0-9a-fA-F]{0,4}$").expect("ipv6 pattern")
});

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
        "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old", "see",
        "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use", "www",
        "com", "org", "net", "html", "htm", "php", "jsp", "asp", "aspx", "http", "https", "home",
        "page", "site", "web", "about", "contact", "login", "register", "search", "more", "view",
        "click", "here", "read", "information", "service",
    ]
    .iter()
    .copied()
    .collect()
});

const IP_TERMS: [&str; 4] = ["localhost", "loopback", "router", "gateway"];

/// Decides whether a token is worth keeping in the wordlist.
#[derive(Clone, Copy, Debug)]
pub struct WordFilter {
    pub min_word_length: usize,
    pub max_word_length: usize,
    pub filter_ips: bool,
}

impl WordFilter {
    pub fn is_valid_word(&self, word: &str) -> bool {
        let len = word.chars().count();
        if len == 0 || len < self.min_word_length || len > self.max_word_length {
            return false;
        }

        if STOP_WORDS.contains(word.to_lowercase().as_str()) {
            return false;
        }

        if self.filter_ips && is_ip_related(word) {
            return false;
        }

        if !word.chars().any(|c| c.is_ascii_alphabetic()) {
            return false;
        }

        !is_numeric(word)
    }
}

/// Heuristic IP detection: full addresses, lone octets and a few network terms.
/// Numbers above 255 are not flagged.
pub fn is_ip_related(word: &str) -> bool {
    if IPV4_PATTERN.is_match(word) && word.parse::<Ipv4Addr>().is_ok() {
        return true;
    }

    if IPV6_PATTERN.is_match(word) && word.parse::<Ipv6Addr>().is_ok() {
        return true;
    }

    if is_numeric(word) {
        if let Ok(num) = word.parse::<u64>() {
            if num <= 255 {
                return true;
            }
        }
    }

    IP_TERMS.iter().any(|term| term.eq_ignore_ascii_case(word))
}

fn is_numeric(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> WordFilter {
        WordFilter {
            min_word_length: 3,
            max_word_length: 50,
            filter_ips: true,
        }
    }

    #[test]
    fn length_bounds() {
        let f = filter();
        assert!(!f.is_valid_word(""));
        assert!(!f.is_valid_word("ab"));
        assert!(f.is_valid_word("abc"));
        assert!(f.is_valid_word(&"a".repeat(50)));
        assert!(!f.is_valid_word(&"a".repeat(51)));

        let strict = WordFilter {
            min_word_length: 5,
            max_word_length: 6,
            ..f
        };
        assert!(!strict.is_valid_word("admin1x"));
        assert!(!strict.is_valid_word("user"));
        assert!(strict.is_valid_word("portal"));
    }

    #[test]
    fn stop_words_any_case() {
        let f = filter();
        assert!(!f.is_valid_word("the"));
        assert!(!f.is_valid_word("Login"));
        assert!(!f.is_valid_word("SEARCH"));
        assert!(f.is_valid_word("dashboard"));
    }

    #[test]
    fn needs_a_letter() {
        let f = filter();
        assert!(!f.is_valid_word("12345"));
        assert!(!f.is_valid_word("9999"));
        assert!(!f.is_valid_word("___"));
        assert!(f.is_valid_word("v2api"));
    }

    #[test]
    fn ip_filter_toggle() {
        let f = filter();
        assert!(!f.is_valid_word("localhost"));
        assert!(!f.is_valid_word("Gateway"));

        let open = WordFilter {
            filter_ips: false,
            ..f
        };
        assert!(open.is_valid_word("localhost"));
        assert!(open.is_valid_word("router"));
    }

    #[test]
    fn ipv4_addresses() {
        assert!(is_ip_related("192.168.1.1"));
        assert!(is_ip_related("0.0.0.0"));
        assert!(is_ip_related("255.255.255.255"));
        assert!(!is_ip_related("999.999.999.999"));
        assert!(!is_ip_related("256.1.1.1"));
    }

    #[test]
    fn every_valid_quad_is_ip() {
        for a in (0..=255u32).step_by(17) {
            for b in [0u32, 1, 128, 255] {
                let ip = format!("{}.{}.{}.{}", a, b, 255 - a, b);
                assert!(is_ip_related(&ip), "{}", ip);
            }
        }
    }

    #[test]
    fn ipv6_addresses() {
        assert!(is_ip_related("::1"));
        assert!(is_ip_related("fe80::1"));
        assert!(is_ip_related("2001:db8:0:0:0:0:2:1"));
        assert!(!is_ip_related("abc:def"));
        assert!(!is_ip_related("gggg::1"));
    }

    #[test]
    fn lone_octets() {
        assert!(is_ip_related("0"));
        assert!(is_ip_related("192"));
        assert!(is_ip_related("255"));
        assert!(!is_ip_related("256"));
        assert!(!is_ip_related("99999999999999999999999"));
    }

    #[test]
    fn ip_terms() {
        assert!(is_ip_related("LocalHost"));
        assert!(is_ip_related("loopback"));
        assert!(!is_ip_related("routers"));
    }
}
