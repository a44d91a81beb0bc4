use crate::crawler::{Crawler, DEFAULT_BATCH_SIZE};
use crate::extractors::ExtractionConfig;
use crate::file_handler;
use crate::retriever::{FetchConfig, Fetcher, DEFAULT_USER_AGENT};
use anyhow::{bail, Context};
use clap::{CommandFactory, Parser};
use std::future::Future;
use std::{path::PathBuf, time::Duration, time::Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "Examples:
  wordcrawl -f urls.txt -o wordlist.txt
  wordcrawl -f ~/recondata/*/alive.txt -o custom.txt --sort
  wordcrawl --files file1.txt file2.txt file3.txt -o combined.txt
  wordcrawl https://example.com https://target.com
  wordcrawl -u https://site1.com -u https://site2.com -o wordlist.txt
  wordcrawl -f \"~/recon/*/alive.txt\" --min-length 4 --verbose";

#[derive(Parser, Debug)]
#[command(
    version,
    author = "Ayush Singh <ayushsingh1325@gmail.com>",
    about = "Extract custom wordlists from URLs for directory fuzzing",
    after_help = EXAMPLES
)]
struct Cli {
    /// URLs to process directly
    urls: Vec<String>,
    /// Single URL to add (can be used multiple times)
    #[arg(short = 'u', long = "url")]
    url: Vec<String>,
    /// File(s) containing URLs (supports wildcards like ~/recon/*/alive.txt)
    #[arg(short = 'f', long = "file", num_args = 1..)]
    file: Vec<String>,
    /// Multiple specific files containing URLs
    #[arg(long, num_args = 1..)]
    files: Vec<String>,
    /// Output wordlist file
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Sort output wordlist
    #[arg(long)]
    sort: bool,
    #[arg(long = "min-length", default_value_t = 3)]
    min_length: usize,
    #[arg(long = "max-length", default_value_t = 50)]
    max_length: usize,
    /// Minimum times a page word must repeat
    #[arg(long = "min-freq", default_value_t = 2)]
    min_freq: usize,
    /// Disable automatic IP address filtering
    #[arg(long)]
    no_ip_filter: bool,
    #[arg(short, long)]
    verbose: bool,
    /// Total request timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout: u64,
    #[arg(long, default_value_t = 8)]
    connect_timeout: u64,
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
    /// Pause between batches in milliseconds
    #[arg(long, default_value_t = 1000)]
    batch_delay_ms: u64,
    #[arg(long, default_value_t = 100)]
    max_connections: usize,
    #[arg(long, default_value_t = 20)]
    max_connections_per_host: usize,
    /// Validate TLS certificates (skipped by default for self-signed targets)
    #[arg(long)]
    verify_tls: bool,
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
}

impl Cli {
    fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig {
            min_word_length: self.min_length,
            max_word_length: self.max_length,
            min_frequency: self.min_freq,
            filter_ips: !self.no_ip_filter,
        }
    }

    fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.timeout),
            connect_timeout: Duration::from_secs(self.connect_timeout),
            max_connections: self.max_connections,
            max_connections_per_host: self.max_connections_per_host,
            accept_invalid_certs: !self.verify_tls,
            user_agent: self.user_agent.clone(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "wordcrawl=debug"
    } else {
        "wordcrawl=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

pub async fn entry() -> anyhow::Result<()> {
    let start_time = Instant::now();
    let opts = Cli::parse();
    init_tracing(opts.verbose);

    let raw_urls = collect_urls(&opts).await;
    if raw_urls.is_empty() {
        Cli::command().print_help()?;
        bail!("No URLs provided.");
    }
    info!("Total raw URLs loaded: {}", raw_urls.len());

    let (urls, invalid) = file_handler::clean_urls(&raw_urls);
    if urls.is_empty() {
        bail!("No valid URLs found after cleaning.");
    }
    info!("Valid unique URLs: {}", urls.len());
    if invalid > 0 {
        info!("Skipped invalid URLs: {}", invalid);
    }
    debug!("First URLs to process:");
    for (i, url) in urls.iter().take(10).enumerate() {
        debug!("  {:2}. {}", i + 1, url);
    }
    if urls.len() > 10 {
        debug!("      ... and {} more URLs", urls.len() - 10);
    }

    let fetcher = Fetcher::new(&opts.fetch_config(), opts.extraction_config())
        .context("failed to build HTTP client")?;
    let crawler = Crawler::new(fetcher)
        .batch_size(opts.batch_size)
        .batch_delay(Duration::from_millis(opts.batch_delay_ms))
        .show_progress(!opts.verbose);

    info!("Processing {} URLs...", urls.len());
    let words = tokio::select! {
        words = crawler.process_urls(&urls) => words,
        _ = interrupted(tokio::signal::ctrl_c()) => bail!("Operation cancelled by user"),
    };

    if words.is_empty() {
        bail!("No words extracted!");
    }

    let mut wordlist: Vec<String> = words.into_iter().collect();
    if opts.sort {
        wordlist.sort();
    }

    match &opts.output {
        Some(path) => {
            file_handler::write_words(path, &wordlist)
                .await
                .with_context(|| format!("Error saving wordlist to {}", path.display()))?;
            info!("Wordlist saved to {}", path.display());
        }
        None => file_handler::write_standard_output(&wordlist).await?,
    }

    info!(
        "✓ Extracted {} unique words from {} URLs in {:.2}s",
        wordlist.len(),
        urls.len(),
        start_time.elapsed().as_secs_f64()
    );
    debug!(
        "Average: {:.1} words per URL",
        wordlist.len() as f64 / urls.len() as f64
    );
    Ok(())
}

async fn interrupted<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    //! Resolves on a delivered signal only. If the handler cannot be
    //! installed the run goes on without interrupt support.
    if let Err(e) = signal.await {
        warn!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn collect_urls(opts: &Cli) -> Vec<String> {
    let mut urls = Vec::new();
    if !opts.urls.is_empty() {
        info!("Adding {} URLs from command line", opts.urls.len());
        urls.extend(opts.urls.iter().cloned());
    }
    if !opts.url.is_empty() {
        info!("Adding {} URLs from -u flags", opts.url.len());
        urls.extend(opts.url.iter().cloned());
    }
    for patterns in [&opts.file, &opts.files] {
        if patterns.is_empty() {
            continue;
        }
        let paths = file_handler::expand_file_patterns(patterns);
        urls.extend(file_handler::load_urls_from_files(&paths).await);
    }
    urls
}
