//! HTML scrape fallback for video candidates
//!
//! Used only after the API path has failed or been exhausted. Nothing in
//! here returns an error to the caller: a failed fetch or an unparseable
//! page is simply "no candidates".

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use regex::Regex;
use reqwest::Client as HttpClient;

use crate::config::Config;
use crate::error::{Result, ScrapeError};

/// Public search results page host
const SCRAPE_BASE_URL: &str = "https://www.youtube.com";

/// Desktop browser identification sent with page fetches
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Video IDs on the provider are always this many characters
pub const VIDEO_ID_LEN: usize = 11;

/// Anchors whose `href` attribute starts with the watch path
static WATCH_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s(?:[^>]*\s)?href\s*=\s*["'](/watch\?v=[^"']*)["']"#)
        .expect("WATCH_ANCHOR is a valid regex pattern")
});

const WATCH_PREFIX: &str = "/watch?v=";

/// Last-resort candidate source.
#[async_trait]
pub trait CandidateScraper: Send + Sync {
    /// First valid video ID for a query, if any
    async fn scrape_one(&self, query: &str) -> Option<String>;

    /// All valid video IDs for a query, deduplicated in first-seen order
    async fn scrape_many(&self, query: &str) -> Vec<String>;
}

/// Extract watch-link video IDs from a results page, in document order.
///
/// Values whose length is not [`VIDEO_ID_LEN`] are discarded.
pub fn extract_video_ids(html: &str) -> Vec<String> {
    WATCH_ANCHOR
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .filter_map(|href| {
            let value = href.as_str().strip_prefix(WATCH_PREFIX)?;
            let id = value.split(['&', '#']).next().unwrap_or_default();
            (id.chars().count() == VIDEO_ID_LEN).then(|| id.to_string())
        })
        .collect()
}

/// Drop repeats, keeping the first occurrence of each ID
pub fn dedup_ordered(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Scraper for the provider's public search results page
pub struct YouTubeScraper {
    http: HttpClient,
    base_url: String,
}

impl YouTubeScraper {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_timeout(
            config.scrape_host.as_deref().unwrap_or(SCRAPE_BASE_URL),
            config.scrape_timeout(),
        )
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(crate::error::ApiError::from)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_ids(&self, query: &str) -> std::result::Result<Vec<String>, ScrapeError> {
        let url = format!("{}/results", self.base_url);
        debug!("Scraping results page for '{}'", query);

        let response = self
            .http
            .get(&url)
            .query(&[("search_query", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        Ok(extract_video_ids(&html))
    }

    async fn ids_or_empty(&self, query: &str) -> Vec<String> {
        match self.fetch_ids(query).await {
            Ok(ids) => {
                debug!("Scraped {} candidate(s) for '{}'", ids.len(), query);
                ids
            }
            Err(e) => {
                warn!("Scrape fallback failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl CandidateScraper for YouTubeScraper {
    async fn scrape_one(&self, query: &str) -> Option<String> {
        self.ids_or_empty(query).await.into_iter().next()
    }

    async fn scrape_many(&self, query: &str) -> Vec<String> {
        dedup_ordered(self.ids_or_empty(query).await)
    }
}

/// Scraper that serves a fixed ID list, for pipeline tests
#[cfg(test)]
#[derive(Default)]
pub struct StaticScraper {
    ids: Vec<String>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl StaticScraper {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(|s| s.to_string()).collect(),
            calls: Default::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl CandidateScraper for StaticScraper {
    async fn scrape_one(&self, _query: &str) -> Option<String> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.ids.first().cloned()
    }

    async fn scrape_many(&self, _query: &str) -> Vec<String> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        dedup_ordered(self.ids.clone())
    }
}
