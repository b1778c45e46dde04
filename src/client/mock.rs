//! Mock video search client for testing
//!
//! Serves canned search results and video metadata so pipeline tests run
//! without network access.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::{DetailFields, VideoMetadata, VideoSearchApi};
use crate::error::ApiError;

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockVideoSearchClient::new()
///     .with_search("Inception 2010 official trailer", &["YoHD9XEInc0"])
///     .with_video(MockVideoSearchClient::public_video("YoHD9XEInc0"));
/// ```
#[derive(Default)]
pub struct MockVideoSearchClient {
    /// Search results keyed by exact query text
    searches: Arc<Mutex<HashMap<String, Vec<String>>>>,
    /// Metadata served by detail lookups
    videos: Arc<Mutex<HashMap<String, VideoMetadata>>>,
    /// Credentials that answer every call with a quota error
    exhausted: Arc<Mutex<HashSet<String>>>,
    /// Persistent search failure (status, body)
    search_failure: Arc<Mutex<Option<(u16, String)>>>,
    /// Persistent detail failure (status, body)
    details_failure: Arc<Mutex<Option<(u16, String)>>>,
    /// Artificial latency per call
    delay: Arc<Mutex<Option<Duration>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured requests for test assertions
    captured_requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub search: usize,
    pub details: usize,
}

/// A captured request for test assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedRequest {
    Search {
        query: String,
        max_results: usize,
        credential: String,
    },
    Details {
        ids: Vec<String>,
        fields: DetailFields,
        credential: String,
    },
}

fn quota_error() -> ApiError {
    ApiError::Status {
        status: 403,
        body: r#"{"error":{"code":403,"errors":[{"reason":"quotaExceeded"}]}}"#.to_string(),
    }
}

impl MockVideoSearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata for a public, embeddable, unrestricted video
    pub fn public_video(id: &str) -> VideoMetadata {
        VideoMetadata {
            id: id.to_string(),
            embeddable: true,
            privacy_status: "public".to_string(),
            title: Some(format!("Title {}", id)),
            channel: Some(format!("Channel {}", id)),
            ..VideoMetadata::default()
        }
    }

    /// Set the IDs returned for an exact query
    pub fn with_search(self, query: &str, ids: &[&str]) -> Self {
        self.searches.try_lock().expect("fresh mock").insert(
            query.to_string(),
            ids.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Add metadata served by detail lookups
    pub fn with_video(self, video: VideoMetadata) -> Self {
        self.videos
            .try_lock()
            .expect("fresh mock")
            .insert(video.id.clone(), video);
        self
    }

    /// Add several public, embeddable videos
    pub fn with_public_videos(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self = self.with_video(Self::public_video(id));
        }
        self
    }

    /// Make every call with this credential fail with a quota error
    pub fn with_exhausted_credential(self, credential: &str) -> Self {
        self.exhausted
            .try_lock()
            .expect("fresh mock")
            .insert(credential.to_string());
        self
    }

    /// Make every search fail with the given status
    pub fn with_search_failure(self, status: u16, body: &str) -> Self {
        *self.search_failure.try_lock().expect("fresh mock") = Some((status, body.to_string()));
        self
    }

    /// Make every detail lookup fail with the given status
    pub fn with_details_failure(self, status: u16, body: &str) -> Self {
        *self.details_failure.try_lock().expect("fresh mock") = Some((status, body.to_string()));
        self
    }

    /// Delay every call, for cancellation tests
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.try_lock().expect("fresh mock") = Some(delay);
        self
    }

    /// Get call counts for verification
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get captured requests for verification
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.captured_requests.lock().await.clone()
    }

    /// Queries seen by `search_ids`, in call order
    pub async fn searched_queries(&self) -> Vec<String> {
        self.captured_requests
            .lock()
            .await
            .iter()
            .filter_map(|r| match r {
                CapturedRequest::Search { query, .. } => Some(query.clone()),
                CapturedRequest::Details { .. } => None,
            })
            .collect()
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn is_exhausted(&self, credential: &str) -> bool {
        self.exhausted.lock().await.contains(credential)
    }
}

#[async_trait]
impl VideoSearchApi for MockVideoSearchClient {
    async fn search_ids(
        &self,
        query: &str,
        max_results: usize,
        credential: &str,
    ) -> Result<Vec<String>, ApiError> {
        self.call_count.lock().await.search += 1;
        self.captured_requests
            .lock()
            .await
            .push(CapturedRequest::Search {
                query: query.to_string(),
                max_results,
                credential: credential.to_string(),
            });
        self.pause().await;

        if self.is_exhausted(credential).await {
            return Err(quota_error());
        }
        if let Some((status, body)) = self.search_failure.lock().await.clone() {
            return Err(ApiError::Status { status, body });
        }

        let ids = self
            .searches
            .lock()
            .await
            .get(query)
            .cloned()
            .unwrap_or_default();
        Ok(ids.into_iter().take(max_results).collect())
    }

    async fn fetch_details(
        &self,
        ids: &[String],
        fields: DetailFields,
        credential: &str,
    ) -> Result<Vec<VideoMetadata>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.call_count.lock().await.details += 1;
        self.captured_requests
            .lock()
            .await
            .push(CapturedRequest::Details {
                ids: ids.to_vec(),
                fields,
                credential: credential.to_string(),
            });
        self.pause().await;

        if self.is_exhausted(credential).await {
            return Err(quota_error());
        }
        if let Some((status, body)) = self.details_failure.lock().await.clone() {
            return Err(ApiError::Status { status, body });
        }

        let videos = self.videos.lock().await;
        Ok(ids.iter().filter_map(|id| videos.get(id).cloned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorClass, classify};

    #[tokio::test]
    async fn test_mock_search_returns_configured_ids() {
        let mock = MockVideoSearchClient::new().with_search("q", &["a", "b", "c"]);

        let ids = mock.search_ids("q", 2, "k").await.unwrap();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(mock.search_ids("other", 5, "k").await.unwrap().is_empty());
        assert_eq!(mock.call_counts().await.search, 2);
    }

    #[tokio::test]
    async fn test_mock_exhausted_credential() {
        let mock = MockVideoSearchClient::new()
            .with_search("q", &["a"])
            .with_exhausted_credential("spent");

        let err = mock.search_ids("q", 5, "spent").await.unwrap_err();
        assert_eq!(classify(&err), ErrorClass::Quota);
        assert_eq!(mock.search_ids("q", 5, "fresh").await.unwrap(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_mock_details_skip_unknown_ids() {
        let mock = MockVideoSearchClient::new().with_public_videos(&["a"]);
        let ids = vec!["a".to_string(), "zzz".to_string()];

        let details = mock
            .fetch_details(&ids, DetailFields::Status, "k")
            .await
            .unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].id, "a");
    }

    #[tokio::test]
    async fn test_mock_captures_requests() {
        let mock = MockVideoSearchClient::new();
        mock.search_ids("q", 6, "k").await.unwrap();

        let captured = mock.captured_requests().await;
        assert_eq!(
            captured,
            vec![CapturedRequest::Search {
                query: "q".to_string(),
                max_results: 6,
                credential: "k".to_string(),
            }]
        );
    }
}
