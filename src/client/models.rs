//! Video records shared by the client, cache and pipeline

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Base URL for video thumbnails
pub const THUMBNAIL_BASE_URL: &str = "https://i.ytimg.com/vi";

/// Base URL for embeddable players
pub const EMBED_BASE_URL: &str = "https://www.youtube.com/embed";

/// Thumbnail URL for a video ID
pub fn thumbnail_url(id: &str) -> String {
    format!("{}/{}/hqdefault.jpg", THUMBNAIL_BASE_URL, id)
}

/// Embeddable player URL for a video ID
pub fn embed_url(id: &str) -> String {
    format!("{}/{}", EMBED_BASE_URL, id)
}

/// A playable video returned to callers.
///
/// `thumbnail_url` and `embed_url` are always derived from `id`; build values
/// through [`VideoCandidate::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCandidate {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub thumbnail_url: String,
    pub embed_url: String,
}

impl VideoCandidate {
    pub fn new(id: impl Into<String>, title: impl Into<String>, channel: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            thumbnail_url: thumbnail_url(&id),
            embed_url: embed_url(&id),
            title: title.into(),
            channel: channel.into(),
            id,
        }
    }

    /// Record for an ID found by scraping, where no snippet is available
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self::new(id, "Song", "YouTube")
    }
}

/// Which detail parts to request from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailFields {
    /// Embeddability, privacy and region restriction
    Status,
    /// Title and channel
    Snippet,
}

impl DetailFields {
    /// Value of the provider's `part` query parameter
    pub fn as_part(&self) -> &'static str {
        match self {
            DetailFields::Status => "status,contentDetails",
            DetailFields::Snippet => "snippet",
        }
    }
}

/// Per-video attributes from a detail lookup.
///
/// Status fields are populated for [`DetailFields::Status`] lookups, snippet
/// fields for [`DetailFields::Snippet`] lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoMetadata {
    pub id: String,
    pub embeddable: bool,
    pub privacy_status: String,
    pub region_blocked: BTreeSet<String>,
    pub title: Option<String>,
    pub channel: Option<String>,
}

impl VideoMetadata {
    /// Convert snippet metadata into a caller-facing record
    pub fn into_candidate(self) -> VideoCandidate {
        VideoCandidate::new(
            self.id,
            self.title.unwrap_or_else(|| "Unknown Title".to_string()),
            self.channel.unwrap_or_else(|| "Unknown Channel".to_string()),
        )
    }
}
