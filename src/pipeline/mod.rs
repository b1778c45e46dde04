//! Media resolution pipeline
//!
//! Turns a movie title into a playable trailer and a list of soundtrack
//! videos. The API path is tried with each credential in turn; when it
//! fails for any reason other than exhausted quota, or finds nothing
//! playable, the scrape fallback takes over. Resolution never fails: the
//! worst case is an empty result.
//!
//! Resolution results and intermediate search results are cached when a
//! [`CacheStore`] is attached. Cache failures are logged and treated as
//! misses.

pub mod queries;
mod songs;
mod trailer;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cache::{CacheStore, CacheTtl, CachedValue, key};
use crate::client::{DetailFields, VideoCandidate, VideoSearchApi, YouTubeClient};
use crate::config::Config;
use crate::credentials::CredentialPool;
use crate::error::{ApiError, ErrorClass, Result, classify};
use crate::filter::filter_embeddable;
use crate::scrape::{CandidateScraper, YouTubeScraper};

/// Results requested per trailer search
pub const TRAILER_RESULTS: usize = 8;

/// Results requested per song query variant
pub const SONG_RESULTS_PER_QUERY: usize = 6;

/// IDs per embeddability lookup
pub const FILTER_BATCH: usize = 20;

/// Songs returned when the caller does not say
pub const DEFAULT_SONG_LIMIT: usize = 10;

/// Trailer and songs for one movie
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieMedia {
    pub trailer_embed_url: Option<String>,
    pub songs: Vec<VideoCandidate>,
}

/// Resolves trailers and songs against the video API, the cache and the
/// scrape fallback.
pub struct MediaResolver {
    api: Arc<dyn VideoSearchApi>,
    scraper: Arc<dyn CandidateScraper>,
    credentials: Arc<CredentialPool>,
    cache: Option<Arc<dyn CacheStore>>,
    ttl: CacheTtl,
    cancel: CancellationToken,
}

impl MediaResolver {
    pub fn new(
        api: Arc<dyn VideoSearchApi>,
        scraper: Arc<dyn CandidateScraper>,
        credentials: Arc<CredentialPool>,
    ) -> Self {
        Self {
            api,
            scraper,
            credentials,
            cache: None,
            ttl: CacheTtl::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Build a resolver with the HTTP client and scraper from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = CredentialPool::new(config.api_keys.clone())?;
        let api = YouTubeClient::new(config)?;
        let scraper = YouTubeScraper::new(config)?;

        Ok(Self::new(Arc::new(api), Arc::new(scraper), Arc::new(credentials))
            .with_ttl(CacheTtl::from_config(config)))
    }

    /// Attach a cache store
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_ttl(mut self, ttl: CacheTtl) -> Self {
        self.ttl = ttl;
        self
    }

    /// Abandon outbound calls once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn credentials(&self) -> &CredentialPool {
        &self.credentials
    }

    /// Resolve trailer and songs concurrently
    pub async fn resolve_media(
        &self,
        title: &str,
        year: &str,
        language: &str,
        song_limit: usize,
    ) -> MovieMedia {
        let (trailer_embed_url, songs) = tokio::join!(
            self.resolve_trailer(title, year, language),
            self.resolve_songs(title, year, language, song_limit)
        );
        MovieMedia {
            trailer_embed_url,
            songs,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run an API call unless the resolution is cancelled first
    async fn guarded<T, F>(&self, call: F) -> std::result::Result<T, ApiError>
    where
        F: Future<Output = std::result::Result<T, ApiError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ApiError::Cancelled),
            result = call => result,
        }
    }

    /// Run a scrape unless the resolution is cancelled first
    async fn guarded_scrape<T: Default, F>(&self, scrape: F) -> T
    where
        F: Future<Output = T>,
    {
        if self.is_cancelled() {
            return T::default();
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => T::default(),
            found = scrape => found,
        }
    }

    /// Read a cached value, purging it when older than `ttl`
    fn read_cache(&self, key: &str, ttl: Option<Duration>) -> Option<CachedValue> {
        let cache = self.cache.as_ref()?;
        match cache.get(key) {
            Ok(Some(entry)) => {
                if let Some(ttl) = ttl
                    && entry.is_stale(ttl, Utc::now())
                {
                    debug!("Cache stale: {}", key);
                    if let Err(e) = cache.delete(key) {
                        warn!("Failed to purge stale cache entry {}: {}", key, e);
                    }
                    return None;
                }
                debug!("Cache hit: {}", key);
                Some(CachedValue::decode(&entry.value))
            }
            Ok(None) => {
                debug!("Cache miss: {}", key);
                None
            }
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    fn write_cache(&self, key: &str, value: &CachedValue) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let result = value.encode().and_then(|raw| cache.put(key, &raw));
        match result {
            Ok(()) => debug!("Cached: {}", key),
            Err(e) => warn!("Cache write failed for {}: {}", key, e),
        }
    }

    /// Search IDs through the `search:` cache
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        credential: &str,
    ) -> std::result::Result<Vec<String>, ApiError> {
        let cache_key = key::search_key(query);
        if let Some(cached) = self.read_cache(&cache_key, Some(self.ttl.search)) {
            let ids = cached.into_ids();
            if !ids.is_empty() {
                return Ok(ids);
            }
        }

        let ids = self
            .guarded(self.api.search_ids(query, max_results, credential))
            .await?;
        debug!("Search '{}' returned {} id(s)", query, ids.len());

        if !ids.is_empty() {
            self.write_cache(&cache_key, &CachedValue::Ids(ids.clone()));
        }
        Ok(ids)
    }

    /// Keep the embeddable IDs, checking `batch_size` IDs per lookup.
    ///
    /// Batches run concurrently; output follows input order.
    async fn playable(
        &self,
        ids: &[String],
        batch_size: usize,
        credential: &str,
    ) -> std::result::Result<Vec<String>, ApiError> {
        let lookups = ids.chunks(batch_size.max(1)).map(|batch| async move {
            let metadata = self
                .guarded(
                    self.api
                        .fetch_details(batch, DetailFields::Status, credential),
                )
                .await?;
            Ok(filter_embeddable(&metadata, batch))
        });

        gather_ordered(lookups).await
    }
}

/// Run branches concurrently and concatenate their results in branch order.
///
/// The first failure is returned as soon as it arrives; branches still in
/// flight are dropped, so they make no further requests.
async fn gather_ordered<T, F>(
    branches: impl IntoIterator<Item = F>,
) -> std::result::Result<Vec<T>, ApiError>
where
    F: Future<Output = std::result::Result<Vec<T>, ApiError>>,
{
    let mut pending: FuturesUnordered<_> = branches
        .into_iter()
        .enumerate()
        .map(|(slot, branch)| async move { (slot, branch.await) })
        .collect();
    let mut slots: Vec<Option<Vec<T>>> = (0..pending.len()).map(|_| None).collect();

    while let Some((slot, result)) = pending.next().await {
        slots[slot] = Some(result?);
    }

    Ok(slots.into_iter().flatten().flatten().collect())
}

/// What a failed attempt means for the retry loop
enum Next {
    Rotate,
    Fallback,
    Abandon,
}

fn next_step(err: &ApiError) -> Next {
    match classify(err) {
        ErrorClass::Quota => Next::Rotate,
        ErrorClass::Upstream => Next::Fallback,
        ErrorClass::Other => Next::Abandon,
    }
}
