//! Structured encoding of cached values

use serde::{Deserialize, Serialize};

use crate::client::VideoCandidate;
use crate::client::models::{EMBED_BASE_URL, embed_url};
use crate::error::CacheError;

/// A value stored under a cache key.
///
/// Serialized as JSON with a `kind` tag, e.g.
/// `{"kind":"ids","data":["YoHD9XEInc0"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CachedValue {
    /// Search result IDs in provider order
    Ids(Vec<String>),
    /// Enriched video records
    Videos(Vec<VideoCandidate>),
    /// A resolved trailer player URL
    EmbedUrl(String),
}

impl CachedValue {
    pub fn encode(&self) -> Result<String, CacheError> {
        serde_json::to_string(self).map_err(|e| CacheError::Codec(e.to_string()))
    }

    /// Decode a stored value.
    ///
    /// Values written before the tagged format are plain strings: an embed
    /// URL or a comma-separated ID list.
    pub fn decode(raw: &str) -> Self {
        if let Ok(value) = serde_json::from_str(raw) {
            return value;
        }

        let raw = raw.trim();
        if raw.starts_with(EMBED_BASE_URL) {
            return CachedValue::EmbedUrl(raw.to_string());
        }
        CachedValue::Ids(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Reduce any cached value to the video IDs it refers to
    pub fn into_ids(self) -> Vec<String> {
        match self {
            CachedValue::Ids(ids) => ids,
            CachedValue::Videos(videos) => videos.into_iter().map(|v| v.id).collect(),
            CachedValue::EmbedUrl(url) => url
                .rsplit('/')
                .next()
                .filter(|id| !id.is_empty())
                .map(|id| vec![id.to_string()])
                .unwrap_or_default(),
        }
    }

    /// Interpret the value as a trailer: the stored URL, or the first ID's embed URL
    pub fn into_embed_url(self) -> Option<String> {
        match self {
            CachedValue::EmbedUrl(url) => Some(url),
            other => other.into_ids().into_iter().next().map(|id| embed_url(&id)),
        }
    }
}
