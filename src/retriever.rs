use crate::extractors::{self, ExtractionConfig};
use dashmap::DashMap;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Network settings for the shared HTTP client.
#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_connections: usize,
    pub max_connections_per_host: usize,
    /// Skips TLS certificate validation. On by default: targets are hosts the
    /// operator is authorized to test, which often serve self-signed certs.
    pub accept_invalid_certs: bool,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(8),
            max_connections: 100,
            max_connections_per_host: 20,
            accept_invalid_certs: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// A page that answered with a 2xx/3xx status.
#[derive(Debug)]
pub struct FetchResult {
    pub url: String,
    pub html: String,
}

/// Caps in-flight requests overall and per host.
struct ConnectionLimits {
    total: Arc<Semaphore>,
    per_host: DashMap<String, Arc<Semaphore>>,
    per_host_limit: usize,
}

struct ConnectionGuard {
    _total: OwnedSemaphorePermit,
    _host: OwnedSemaphorePermit,
}

impl ConnectionLimits {
    fn new(total: usize, per_host: usize) -> Self {
        ConnectionLimits {
            total: Arc::new(Semaphore::new(total.max(1))),
            per_host: DashMap::new(),
            per_host_limit: per_host.max(1),
        }
    }

    async fn acquire(&self, host: &str) -> Result<ConnectionGuard, AcquireError> {
        let host_semaphore = self
            .per_host
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_host_limit)))
            .clone();
        let host = host_semaphore.acquire_owned().await?;
        let total = self.total.clone().acquire_owned().await?;
        Ok(ConnectionGuard {
            _total: total,
            _host: host,
        })
    }
}

pub struct Fetcher {
    client: Client,
    extraction: ExtractionConfig,
    limits: ConnectionLimits,
}

impl Fetcher {
    pub fn new(config: &FetchConfig, extraction: ExtractionConfig) -> Result<Self, reqwest::Error> {
        let client = Self::client_builder(config).build()?;
        Ok(Self::with_client(client, config, extraction))
    }

    pub fn client_builder(config: &FetchConfig) -> reqwest::ClientBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );
        headers.insert(header::DNT, HeaderValue::from_static("1"));
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        );

        Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.max_connections_per_host)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .gzip(true)
            .deflate(true)
    }

    pub fn with_client(client: Client, config: &FetchConfig, extraction: ExtractionConfig) -> Self {
        Fetcher {
            client,
            extraction,
            limits: ConnectionLimits::new(config.max_connections, config.max_connections_per_host),
        }
    }

    pub async fn fetch_and_extract(&self, url: &str) -> HashSet<String> {
        //! Never fails: an unreachable page still yields its domain words.
        let mut words = extractors::domain::extract(url, &self.extraction);

        let page = match self.fetch_page(url).await {
            Some(x) => x,
            None => {
                debug!("✗ Could not fetch content from {}", url);
                return words;
            }
        };

        // Parsing is CPU-bound and the document is not Send.
        let config = self.extraction;
        let FetchResult { url: fetched_url, html } = page;
        let page_words = tokio::task::spawn_blocking(move || {
            extractors::get_words_from_html(html.as_str(), &config)
        })
        .await;

        match page_words {
            Ok(x) => {
                words.extend(x);
                debug!("✓ Extracted {} words from {}", words.len(), fetched_url);
            }
            Err(e) => debug!("Error parsing HTML from {}: {}", url, e),
        }
        words
    }

    pub async fn fetch_page(&self, url: &str) -> Option<FetchResult> {
        //! Tries the URL as given, then with its scheme swapped.
        let mut candidates = vec![url.to_string()];
        if let Some(x) = swap_scheme(url) {
            candidates.push(x);
        }

        let last = candidates.len() - 1;
        for (i, candidate) in candidates.iter().enumerate() {
            match self.get_page(candidate).await {
                Ok(Some(html)) => {
                    return Some(FetchResult {
                        url: candidate.to_string(),
                        html,
                    })
                }
                Ok(None) => continue,
                Err(e) => {
                    if i == last {
                        debug!("Connection error for {}: {}", candidate, e);
                    }
                }
            }
        }
        None
    }

    async fn get_page(&self, url: &str) -> Result<Option<String>, reqwest::Error> {
        //! `Ok(None)` for statuses outside [200, 400).
        let host = Url::parse(url)
            .ok()
            .and_then(|x| x.host_str().map(str::to_string))
            .unwrap_or_default();
        let _guard = match self.limits.acquire(&host).await {
            Ok(x) => x,
            Err(e) => {
                debug!("Connection limiter closed for {}: {}", url, e);
                return Ok(None);
            }
        };

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if status.is_success() || status.is_redirection() {
            return Ok(Some(resp.text().await?));
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            debug!("HTTP {} (Forbidden) for {}", status.as_u16(), url);
        } else {
            debug!("HTTP {} for {}", status.as_u16(), url);
        }
        Ok(None)
    }
}

pub fn swap_scheme(url: &str) -> Option<String> {
    if let Some(rest) = url.strip_prefix("https://") {
        Some(format!("http://{}", rest))
    } else {
        url.strip_prefix("http://")
            .map(|rest| format!("https://{}", rest))
    }
}
