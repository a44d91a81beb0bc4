use crate::retriever::Fetcher;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};

pub const DEFAULT_BATCH_SIZE: usize = 50;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_secs(1);

pub struct Crawler {
    fetcher: Arc<Fetcher>,
    batch_size: usize,
    batch_delay: Duration,
    show_progress: bool,
}

impl Crawler {
    pub fn new(fetcher: Fetcher) -> Self {
        Crawler {
            fetcher: Arc::new(fetcher),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            show_progress: true,
        }
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub async fn process_urls(&self, urls: &[String]) -> HashSet<String> {
        //! Fetches every URL in batches and unions their words.
        //! A batch is fully drained before the next one starts; inside a batch
        //! results are merged in whatever order they complete.
        let mut all_words = HashSet::new();
        let progress = self.progress_bar(urls.len() as u64);
        let batch_count = (urls.len() + self.batch_size - 1) / self.batch_size;

        for (i, batch) in urls.chunks(self.batch_size).enumerate() {
            let batch_start = i * self.batch_size + 1;
            debug!(
                "Processing batch {}-{}...",
                batch_start,
                batch_start + batch.len() - 1
            );

            let mut tasks = JoinSet::new();
            for url in batch {
                let fetcher = self.fetcher.clone();
                let url = url.clone();
                tasks.spawn(async move { fetcher.fetch_and_extract(&url).await });
            }

            while let Some(result) = tasks.join_next().await {
                match result {
                    Ok(words) => merge_words(&mut all_words, words),
                    Err(e) => warn!("Fetch task failed: {}", e),
                }
                progress.inc(1);
            }

            if i + 1 < batch_count {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        progress.finish_and_clear();
        all_words
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} Completed {pos}/{len} URLs [{elapsed_precise}] {wide_bar:.cyan/blue}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    }
}

/// Union merge: arrival order never changes the result.
pub fn merge_words(all_words: &mut HashSet<String>, words: HashSet<String>) {
    all_words.extend(words);
}
