//! Per-endpoint request pacing for the video API
//!
//! Search calls are far more expensive against the daily quota than detail
//! lookups, so each endpoint family gets its own limiter.

use std::collections::HashMap;
use std::num::NonZeroU32;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;

/// Categories of video API endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointCategory {
    /// /search - 100 quota units per call
    Search,
    /// /videos - 1 quota unit per call
    Videos,
}

impl EndpointCategory {
    /// All endpoint categories for initialization.
    pub const ALL: [EndpointCategory; 2] = [EndpointCategory::Search, EndpointCategory::Videos];

    /// Categorize a request by its path (without the base URL).
    pub fn from_path(path: &str) -> Self {
        let path = path.strip_prefix("/youtube/v3").unwrap_or(path);
        if path.starts_with("/search") {
            EndpointCategory::Search
        } else {
            EndpointCategory::Videos
        }
    }

    /// Multiplier applied to the configured rate.
    fn rate_multiplier(&self) -> u32 {
        match self {
            EndpointCategory::Search => 1,
            EndpointCategory::Videos => 4,
        }
    }
}

/// Collection of rate limiters for all endpoint categories.
pub struct RateLimiterSet {
    limiters: HashMap<EndpointCategory, RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RateLimiterSet {
    /// Create limiters allowing `per_second` search calls per second.
    pub fn new(per_second: u32) -> Self {
        let base = per_second.max(1);
        let limiters = EndpointCategory::ALL
            .into_iter()
            .map(|category| {
                let rate = base.saturating_mul(category.rate_multiplier());
                let quota = Quota::per_second(NonZeroU32::new(rate).unwrap_or(NonZeroU32::MIN));
                (category, RateLimiter::direct(quota))
            })
            .collect();

        Self { limiters }
    }

    /// Wait until a request in this category may be sent.
    pub async fn wait_for(&self, category: EndpointCategory) {
        if let Some(limiter) = self.limiters.get(&category) {
            if limiter.check().is_err() {
                debug!("Pacing {:?} request", category);
                limiter.until_ready().await;
            }
        }
    }
}
