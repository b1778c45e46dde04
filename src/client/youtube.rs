//! YouTube Data API client implementation

use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::rate_limit::{EndpointCategory, RateLimiterSet};
use super::{DetailFields, VideoMetadata, VideoSearchApi};
use crate::config::Config;
use crate::error::{ApiError, Result};

/// YouTube Data API base URL
const API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Normalize free text for the `q` parameter.
///
/// Runs of whitespace collapse to single spaces, which the form encoder
/// then turns into `+`, so equal queries always produce equal requests.
pub fn search_query_param(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The provider returns `id` either as a bare string (`/videos`) or as an
/// object carrying `videoId` (`/search`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemId {
    Plain(String),
    Object {
        #[serde(rename = "videoId")]
        video_id: Option<String>,
    },
}

impl ItemId {
    fn into_video_id(self) -> Option<String> {
        let id = match self {
            ItemId::Plain(id) => Some(id),
            ItemId::Object { video_id } => video_id,
        }?;
        let id = id.trim().to_string();
        (!id.is_empty()).then_some(id)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: Option<ItemId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    #[serde(default)]
    id: Option<ItemId>,
    #[serde(default)]
    status: Option<VideoStatus>,
    #[serde(default)]
    content_details: Option<ContentDetails>,
    #[serde(default)]
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatus {
    #[serde(default)]
    embeddable: bool,
    #[serde(default)]
    privacy_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    #[serde(default)]
    region_restriction: Option<RegionRestriction>,
}

#[derive(Debug, Deserialize)]
struct RegionRestriction {
    #[serde(default)]
    blocked: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    channel_title: Option<String>,
}

impl VideoItem {
    fn into_metadata(self) -> Option<VideoMetadata> {
        let id = self.id?.into_video_id()?;
        let (embeddable, privacy_status) = match self.status {
            Some(status) => (status.embeddable, status.privacy_status.unwrap_or_default()),
            None => (false, String::new()),
        };
        let region_blocked: BTreeSet<String> = self
            .content_details
            .and_then(|d| d.region_restriction)
            .and_then(|r| r.blocked)
            .unwrap_or_default()
            .into_iter()
            .collect();
        let (title, channel) = match self.snippet {
            Some(snippet) => (snippet.title, snippet.channel_title),
            None => (None, None),
        };

        Some(VideoMetadata {
            id,
            embeddable,
            privacy_status,
            region_blocked,
            title,
            channel,
        })
    }
}

/// YouTube Data API v3 client
pub struct YouTubeClient {
    http: HttpClient,
    base_url: String,
    region_code: String,
    relevance_language: String,
    limiters: RateLimiterSet,
}

impl YouTubeClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(ApiError::from)?;

        let base_url = config
            .api_host
            .clone()
            .unwrap_or_else(|| API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http,
            base_url,
            region_code: config.region_code.clone(),
            relevance_language: config.relevance_language.clone(),
            limiters: RateLimiterSet::new(config.requests_per_second),
        })
    }

    /// Issue a GET and return the body, mapping failures to [`ApiError`]
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> std::result::Result<String, ApiError> {
        self.limiters.wait_for(EndpointCategory::from_path(path)).await;

        let url = format!("{}{}", self.base_url, path);
        log::debug!("Video API request: GET {}", url);

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// Parse a results envelope, surfacing embedded `error` objects
fn parse_envelope<T: for<'de> Deserialize<'de>>(
    body: &str,
) -> std::result::Result<Vec<T>, ApiError> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
    if envelope.error.is_some() {
        return Err(ApiError::ErrorPayload(body.to_string()));
    }
    Ok(envelope.items)
}

#[async_trait]
impl VideoSearchApi for YouTubeClient {
    async fn search_ids(
        &self,
        query: &str,
        max_results: usize,
        credential: &str,
    ) -> std::result::Result<Vec<String>, ApiError> {
        let q = search_query_param(query);
        let max_results = max_results.to_string();
        let body = self
            .get(
                "/search",
                &[
                    ("part", "snippet"),
                    ("type", "video"),
                    ("maxResults", &max_results),
                    ("q", &q),
                    ("key", credential),
                    ("regionCode", &self.region_code),
                    ("relevanceLanguage", &self.relevance_language),
                ],
            )
            .await?;

        let items: Vec<SearchItem> = parse_envelope(&body)?;
        Ok(items
            .into_iter()
            .filter_map(|item| item.id.and_then(ItemId::into_video_id))
            .collect())
    }

    async fn fetch_details(
        &self,
        ids: &[String],
        fields: DetailFields,
        credential: &str,
    ) -> std::result::Result<Vec<VideoMetadata>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let body = self
            .get(
                "/videos",
                &[
                    ("part", fields.as_part()),
                    ("id", &joined),
                    ("key", credential),
                ],
            )
            .await?;

        let items: Vec<VideoItem> = parse_envelope(&body)?;
        Ok(items.into_iter().filter_map(VideoItem::into_metadata).collect())
    }
}
