//! Video search provider client

use async_trait::async_trait;

use crate::error::ApiError;

#[cfg(test)]
pub mod mock;
pub mod models;
pub mod rate_limit;
pub mod youtube;

#[cfg(test)]
pub use mock::MockVideoSearchClient;
pub use models::{DetailFields, VideoCandidate, VideoMetadata};
pub use youtube::YouTubeClient;

/// Maximum number of IDs the provider accepts in one detail lookup
pub const MAX_DETAIL_BATCH: usize = 50;

/// Video search provider operations.
///
/// Implementations are plain reads: they never touch the cache or the
/// credential pool. The caller decides what to do with an error.
#[async_trait]
pub trait VideoSearchApi: Send + Sync {
    /// Search for videos and return their IDs in provider order
    async fn search_ids(
        &self,
        query: &str,
        max_results: usize,
        credential: &str,
    ) -> Result<Vec<String>, ApiError>;

    /// Look up one batch (at most [`MAX_DETAIL_BATCH`]) of video IDs.
    ///
    /// An empty `ids` slice returns an empty batch without any request.
    async fn fetch_details(
        &self,
        ids: &[String],
        fields: DetailFields,
        credential: &str,
    ) -> Result<Vec<VideoMetadata>, ApiError>;
}
