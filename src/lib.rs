//! reelfinder - locate playable trailers and soundtrack videos for movies
//!
//! The [`MediaResolver`] queries a quota-limited video search API, keeps only
//! videos that can be embedded, rotates API keys when one runs out of quota
//! and scrapes the public results page as a last resort.

pub mod cache;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod scrape;

pub use client::VideoCandidate;
pub use config::Config;
pub use credentials::CredentialPool;
pub use error::{Error, Result};
pub use pipeline::{DEFAULT_SONG_LIMIT, MediaResolver, MovieMedia};
