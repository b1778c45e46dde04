//! Trailer resolution

use log::{debug, info, warn};

use super::queries::trailer_query;
use super::{FILTER_BATCH, MediaResolver, Next, TRAILER_RESULTS, next_step};
use crate::cache::{CachedValue, key};
use crate::client::models::embed_url;
use crate::error::ApiError;

impl MediaResolver {
    /// Embed URL of the first playable trailer for a movie.
    ///
    /// Returns `None` for a blank title, when nothing playable is found, or
    /// when the resolution is cancelled.
    pub async fn resolve_trailer(&self, title: &str, year: &str, language: &str) -> Option<String> {
        if title.trim().is_empty() {
            return None;
        }

        let query = trailer_query(title, year, language);
        let cache_key = key::trailer_key(&query);

        if let Some(cached) = self.read_cache(&cache_key, self.ttl.trailer)
            && let Some(url) = cached.into_embed_url()
        {
            return Some(url);
        }

        for attempt in 0..self.credentials.size() {
            if self.is_cancelled() {
                return None;
            }

            let (index, credential) = self.credentials.checkout();
            let credential = credential.to_string();
            match self.trailer_attempt(&query, &credential).await {
                Ok(Some(id)) => {
                    let url = embed_url(&id);
                    self.write_cache(&cache_key, &CachedValue::EmbedUrl(url.clone()));
                    return Some(url);
                }
                Ok(None) => {
                    debug!("No playable trailer from the API for '{}'", query);
                    break;
                }
                Err(e) => match next_step(&e) {
                    Next::Rotate => {
                        info!(
                            "Quota exceeded resolving trailer (attempt {}), rotating key",
                            attempt + 1
                        );
                        self.credentials.rotate_from(index);
                    }
                    Next::Fallback => {
                        warn!("Trailer search failed for '{}': {}", query, e);
                        break;
                    }
                    Next::Abandon => return None,
                },
            }
        }

        let found = self.guarded_scrape(self.scraper.scrape_one(&query)).await;
        found.map(|id| embed_url(&id))
    }

    async fn trailer_attempt(
        &self,
        query: &str,
        credential: &str,
    ) -> Result<Option<String>, ApiError> {
        let ids = self.search(query, TRAILER_RESULTS, credential).await?;
        let playable = self.playable(&ids, FILTER_BATCH, credential).await?;
        Ok(playable.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use tokio_util::sync::CancellationToken;

    use super::super::test_support::harness;
    use crate::cache::{CacheStore, CacheTtl, CachedValue};
    use crate::client::MockVideoSearchClient;

    const QUERY: &str = "Inception 2010 official trailer";

    #[tokio::test]
    async fn test_cached_trailer_makes_no_calls() {
        let h = harness(MockVideoSearchClient::new(), &["zzzzzzzzzzz"], &["k1"]);
        h.cache
            .put(QUERY, "https://www.youtube.com/embed/YoHD9XEInc0")
            .unwrap();

        let url = h.resolver.resolve_trailer("Inception", "2010", "").await;

        assert_eq!(
            url.as_deref(),
            Some("https://www.youtube.com/embed/YoHD9XEInc0")
        );
        let counts = h.api.call_counts().await;
        assert_eq!(counts.search + counts.details, 0);
        assert_eq!(h.scraper.calls(), 0);
    }

    #[tokio::test]
    async fn test_old_trailer_entry_still_served_by_default() {
        let h = harness(MockVideoSearchClient::new(), &[], &["k1"]);
        h.cache
            .insert_at(
                QUERY,
                &CachedValue::EmbedUrl("https://www.youtube.com/embed/YoHD9XEInc0".into())
                    .encode()
                    .unwrap(),
                Utc::now() - chrono::Duration::days(30),
            )
            .unwrap();

        let url = h.resolver.resolve_trailer("Inception", "2010", "").await;
        assert!(url.is_some());
        assert_eq!(h.api.call_counts().await.search, 0);
    }

    #[tokio::test]
    async fn test_trailer_ttl_when_configured() {
        let api = MockVideoSearchClient::new()
            .with_search(QUERY, &["aaaaaaaaaaa"])
            .with_public_videos(&["aaaaaaaaaaa"]);
        let mut h = harness(api, &[], &["k1"]);
        h.resolver = h.resolver.with_ttl(CacheTtl {
            trailer: Some(Duration::from_secs(60 * 60)),
            ..CacheTtl::default()
        });
        h.cache
            .insert_at(
                QUERY,
                "https://www.youtube.com/embed/oldoldoldol",
                Utc::now() - chrono::Duration::hours(2),
            )
            .unwrap();

        let url = h.resolver.resolve_trailer("Inception", "2010", "").await;
        assert_eq!(
            url.as_deref(),
            Some("https://www.youtube.com/embed/aaaaaaaaaaa")
        );
    }

    #[tokio::test]
    async fn test_skips_private_candidate() {
        let mut private = MockVideoSearchClient::public_video("bbbbbbbbbbb");
        private.privacy_status = "private".to_string();
        let api = MockVideoSearchClient::new()
            .with_search(QUERY, &["aaaaaaaaaaa", "bbbbbbbbbbb", "ccccccccccc"])
            .with_public_videos(&["aaaaaaaaaaa", "ccccccccccc"])
            .with_video(private);
        let h = harness(api, &[], &["k1"]);

        let url = h.resolver.resolve_trailer("Inception", "2010", "").await;

        assert_eq!(
            url.as_deref(),
            Some("https://www.youtube.com/embed/aaaaaaaaaaa")
        );
        let stored = h.cache.get(QUERY).unwrap().unwrap();
        assert_eq!(
            CachedValue::decode(&stored.value),
            CachedValue::EmbedUrl("https://www.youtube.com/embed/aaaaaaaaaaa".into())
        );
    }

    #[tokio::test]
    async fn test_first_playable_wins_when_first_is_private() {
        let mut private = MockVideoSearchClient::public_video("aaaaaaaaaaa");
        private.privacy_status = "private".to_string();
        let api = MockVideoSearchClient::new()
            .with_search(QUERY, &["aaaaaaaaaaa", "bbbbbbbbbbb"])
            .with_video(private)
            .with_public_videos(&["bbbbbbbbbbb"]);
        let h = harness(api, &[], &["k1"]);

        let url = h.resolver.resolve_trailer("Inception", "2010", "").await;
        assert_eq!(
            url.as_deref(),
            Some("https://www.youtube.com/embed/bbbbbbbbbbb")
        );
    }

    #[tokio::test]
    async fn test_quota_rotates_to_next_key() {
        let api = MockVideoSearchClient::new()
            .with_exhausted_credential("k1")
            .with_search(QUERY, &["aaaaaaaaaaa"])
            .with_public_videos(&["aaaaaaaaaaa"]);
        let h = harness(api, &[], &["k1", "k2"]);

        let url = h.resolver.resolve_trailer("Inception", "2010", "").await;

        assert_eq!(
            url.as_deref(),
            Some("https://www.youtube.com/embed/aaaaaaaaaaa")
        );
        assert_eq!(h.resolver.credentials().current(), "k2");
        assert_eq!(h.scraper.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_keys_exhausted_scrapes_once() {
        let api = MockVideoSearchClient::new()
            .with_exhausted_credential("k1")
            .with_exhausted_credential("k2");
        let h = harness(api, &["xxxxxxxxxxx"], &["k1", "k2"]);

        let url = h.resolver.resolve_trailer("Inception", "2010", "").await;

        assert_eq!(
            url.as_deref(),
            Some("https://www.youtube.com/embed/xxxxxxxxxxx")
        );
        // One search per key, then give up on the API
        assert_eq!(h.api.call_counts().await.search, 2);
        assert_eq!(h.scraper.calls(), 1);
        // Scraped trailers are not cached
        assert!(h.cache.get(QUERY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upstream_error_goes_straight_to_scrape() {
        let api = MockVideoSearchClient::new().with_search_failure(500, "backendError");
        let h = harness(api, &["xxxxxxxxxxx"], &["k1", "k2", "k3"]);

        let url = h.resolver.resolve_trailer("Inception", "2010", "").await;

        assert_eq!(
            url.as_deref(),
            Some("https://www.youtube.com/embed/xxxxxxxxxxx")
        );
        assert_eq!(h.api.call_counts().await.search, 1);
        assert_eq!(h.resolver.credentials().current(), "k1");
    }

    #[tokio::test]
    async fn test_nothing_anywhere_is_none() {
        let h = harness(MockVideoSearchClient::new(), &[], &["k1"]);
        assert!(h.resolver.resolve_trailer("Obscure", "1901", "").await.is_none());
        assert_eq!(h.scraper.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_title_makes_no_calls() {
        let h = harness(MockVideoSearchClient::new(), &["xxxxxxxxxxx"], &["k1"]);
        assert!(h.resolver.resolve_trailer("   ", "2010", "").await.is_none());
        assert_eq!(h.api.call_counts().await.search, 0);
        assert_eq!(h.scraper.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let mut h = harness(MockVideoSearchClient::new(), &["xxxxxxxxxxx"], &["k1"]);
        h.resolver = h.resolver.with_cancellation(token);

        assert!(h.resolver.resolve_trailer("Inception", "2010", "").await.is_none());
        assert_eq!(h.api.call_counts().await.search, 0);
        assert_eq!(h.scraper.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_mid_flight() {
        let token = CancellationToken::new();
        let api = MockVideoSearchClient::new()
            .with_search(QUERY, &["aaaaaaaaaaa"])
            .with_delay(Duration::from_secs(30));
        let mut h = harness(api, &["xxxxxxxxxxx"], &["k1"]);
        h.resolver = h.resolver.with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let started = std::time::Instant::now();
        let url = h.resolver.resolve_trailer("Inception", "2010", "").await;
        canceller.await.unwrap();

        assert!(url.is_none());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(h.scraper.calls(), 0);
    }
}
