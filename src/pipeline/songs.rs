//! Soundtrack song resolution

use std::collections::HashMap;

use log::{debug, info, warn};

use super::queries::song_queries;
use super::{
    FILTER_BATCH, MediaResolver, Next, SONG_RESULTS_PER_QUERY, gather_ordered, next_step,
};
use crate::cache::{CachedValue, key};
use crate::client::{DetailFields, MAX_DETAIL_BATCH, VideoCandidate, VideoMetadata};
use crate::error::ApiError;
use crate::scrape::dedup_ordered;

impl MediaResolver {
    /// Up to `limit` playable soundtrack videos for a movie.
    ///
    /// Fans out over several query phrasings and merges their results in
    /// phrasing order. Falls back to scraped placeholder records when the
    /// API path is exhausted, failing or empty.
    pub async fn resolve_songs(
        &self,
        title: &str,
        year: &str,
        language: &str,
        limit: usize,
    ) -> Vec<VideoCandidate> {
        if title.trim().is_empty() || limit == 0 {
            return Vec::new();
        }

        let variants = song_queries(title, year, language);
        let Some(songs_key) = key::songs_key(&variants) else {
            return Vec::new();
        };

        for attempt in 0..self.credentials.size() {
            if self.is_cancelled() {
                return Vec::new();
            }

            let (index, credential) = self.credentials.checkout();
            let credential = credential.to_string();
            match self.songs_attempt(&variants, limit, &credential).await {
                Ok(videos) if !videos.is_empty() => {
                    self.write_cache(&songs_key, &CachedValue::Videos(videos.clone()));
                    return videos;
                }
                Ok(_) => {
                    debug!("No playable songs from the API for '{}'", songs_key);
                    break;
                }
                Err(e) => match next_step(&e) {
                    Next::Rotate => {
                        info!(
                            "Quota exceeded resolving songs (attempt {}), rotating key",
                            attempt + 1
                        );
                        self.credentials.rotate_from(index);
                    }
                    Next::Fallback => {
                        warn!("Song search failed for '{}': {}", songs_key, e);
                        break;
                    }
                    Next::Abandon => return Vec::new(),
                },
            }
        }

        self.scrape_songs(&songs_key, limit).await
    }

    async fn songs_attempt(
        &self,
        variants: &[String],
        limit: usize,
        credential: &str,
    ) -> Result<Vec<VideoCandidate>, ApiError> {
        let streams = gather_ordered(
            variants
                .iter()
                .map(|query| self.variant_ids(query, credential)),
        )
        .await?;
        let candidates = dedup_ordered(streams);
        debug!("{} unique song candidate(s)", candidates.len());

        let playable = self.playable(&candidates, FILTER_BATCH, credential).await?;
        let selected: Vec<String> = dedup_ordered(playable).into_iter().take(limit).collect();
        if selected.is_empty() {
            return Ok(Vec::new());
        }

        self.enrich(&selected, credential).await
    }

    /// IDs for one query variant: a cached value under the variant itself,
    /// else a search
    async fn variant_ids(&self, query: &str, credential: &str) -> Result<Vec<String>, ApiError> {
        if let Some(cached) = self.read_cache(query, Some(self.ttl.search)) {
            let ids = cached.into_ids();
            if !ids.is_empty() {
                return Ok(ids);
            }
        }
        self.search(query, SONG_RESULTS_PER_QUERY, credential).await
    }

    /// Title and channel for `ids`, in the same order, through the
    /// `details:` cache
    async fn enrich(&self, ids: &[String], credential: &str) -> Result<Vec<VideoCandidate>, ApiError> {
        let cache_key = key::details_key(ids);
        if let Some(CachedValue::Videos(videos)) = self.read_cache(&cache_key, Some(self.ttl.search))
            && !videos.is_empty()
        {
            return Ok(videos);
        }

        let lookups = ids.chunks(MAX_DETAIL_BATCH).map(|batch| {
            self.guarded(
                self.api
                    .fetch_details(batch, DetailFields::Snippet, credential),
            )
        });
        let mut by_id: HashMap<String, VideoMetadata> = gather_ordered(lookups)
            .await?
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect();

        let videos: Vec<VideoCandidate> = ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(VideoMetadata::into_candidate)
            .collect();

        if !videos.is_empty() {
            self.write_cache(&cache_key, &CachedValue::Videos(videos.clone()));
        }
        Ok(videos)
    }

    async fn scrape_songs(&self, query: &str, limit: usize) -> Vec<VideoCandidate> {
        let ids = self.guarded_scrape(self.scraper.scrape_many(query)).await;
        ids.into_iter()
            .take(limit)
            .map(VideoCandidate::placeholder)
            .collect()
    }
}
