use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{info, warn};

static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("scheme pattern"));

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

pub async fn read_urls(file_path: &Path) -> Result<Vec<String>, LoadError> {
    //! One URL per line; blank lines and `#` comments are skipped.
    let io_err = |source| LoadError::Io {
        path: file_path.to_path_buf(),
        source,
    };
    let file = File::open(file_path).await.map_err(io_err)?;
    let reader = BufReader::new(file);
    let mut list = reader.split(b'\n');
    let mut urls = Vec::new();
    while let Some(line) = list.next_segment().await.map_err(io_err)? {
        let line = String::from_utf8_lossy(&line);
        let line = line.trim();
        if !line.is_empty() && !line.starts_with('#') {
            urls.push(line.to_string());
        }
    }

    Ok(urls)
}

pub fn expand_file_patterns(patterns: &[String]) -> Vec<PathBuf> {
    //! Existing files are taken as is, `*`/`?` patterns are globbed.
    let mut files = Vec::new();
    for pattern in patterns {
        let expanded = expand_tilde(pattern);
        if expanded.is_file() {
            files.push(expanded);
            continue;
        }

        let expanded_str = expanded.to_string_lossy();
        if expanded_str.contains('*') || expanded_str.contains('?') {
            match glob_files(&expanded_str) {
                Ok(matches) if matches.is_empty() => {
                    warn!("No files found matching pattern '{}'", pattern)
                }
                Ok(matches) => files.extend(matches),
                Err(e) => warn!("{}", e),
            }
        } else {
            warn!("File not found '{}'", pattern);
        }
    }
    files
}

fn glob_files(pattern: &str) -> Result<Vec<PathBuf>, LoadError> {
    let paths = glob::glob(pattern).map_err(|source| LoadError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;
    let mut matches: Vec<PathBuf> = paths.filter_map(Result::ok).filter(|x| x.is_file()).collect();
    matches.sort();
    Ok(matches)
}

fn expand_tilde(pattern: &str) -> PathBuf {
    if pattern == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = pattern.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(pattern)
}

pub async fn load_urls_from_files(file_paths: &[PathBuf]) -> Vec<String> {
    //! Unreadable files are reported and skipped.
    let mut all_urls = Vec::new();
    if file_paths.is_empty() {
        return all_urls;
    }

    info!("Loading URLs from {} file(s):", file_paths.len());
    for path in file_paths {
        match read_urls(path).await {
            Ok(urls) => {
                let name = path
                    .file_name()
                    .map(|x| x.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                info!("  {}: {} URLs", name, urls.len());
                all_urls.extend(urls);
            }
            Err(e) => warn!("  {}", e),
        }
    }
    all_urls
}

pub fn normalize_url(url: &str) -> Option<String> {
    //! Gives every URL a scheme; `None` for blanks, comments and hostless input.
    let url = url.trim();
    if url.is_empty() || url.starts_with('#') {
        return None;
    }

    let normalized = if SCHEME_PREFIX.is_match(url) {
        url.to_string()
    } else if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        format!("https://{}", url)
    };

    match Url::parse(&normalized) {
        Ok(x) if x.host_str().map_or(false, |h| !h.is_empty()) => Some(normalized),
        _ => None,
    }
}

pub fn clean_urls(urls: &[String]) -> (Vec<String>, usize) {
    //! Normalizes and deduplicates, keeping first-seen order.
    //! Returns the clean list and how many inputs were invalid.
    let mut seen = HashSet::new();
    let mut clean = Vec::new();
    let mut invalid = 0;
    for url in urls {
        match normalize_url(url) {
            Some(x) => {
                if seen.insert(x.clone()) {
                    clean.push(x);
                }
            }
            None => invalid += 1,
        }
    }
    (clean, invalid)
}

pub async fn write_words(file_path: &Path, words: &[String]) -> Result<(), std::io::Error> {
    let writer = BufWriter::new(File::create(file_path).await?);
    write_lines(writer, words).await
}

pub async fn write_standard_output(words: &[String]) -> Result<(), std::io::Error> {
    write_lines(BufWriter::new(tokio::io::stdout()), words).await
}

async fn write_lines<W: AsyncWrite + Unpin>(
    mut writer: BufWriter<W>,
    words: &[String],
) -> Result<(), std::io::Error> {
    for word in words {
        writer.write_all(word.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    writer.flush().await?;
    Ok(())
}
