//! Command execution context
//!
//! Loads configuration once and builds the resolver every media command
//! runs against.

use std::sync::Arc;

use log::warn;
use tokio_util::sync::CancellationToken;

use crate::cli::args::GlobalOptions;
use crate::cli::OutputFormat;
use reelfinder::cache::SqliteCacheStore;
use reelfinder::{Config, MediaResolver, Result};

/// Context for command execution containing the resolver and runtime options.
pub struct CommandContext {
    /// Resolver wired to the HTTP client, scraper and (unless disabled) the cache
    pub resolver: MediaResolver,
    /// Output format preference
    pub format: OutputFormat,
    cancel: CancellationToken,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// A cache that cannot be opened is logged and skipped; resolution
    /// works without it.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or has no API keys.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let mut config = Config::load_at(opts.config_ref())?;
        if let Some(host) = &opts.api_host {
            config.api_host = Some(host.clone());
        }
        if let Some(host) = &opts.scrape_host {
            config.scrape_host = Some(host.clone());
        }

        let cancel = CancellationToken::new();
        let mut resolver = MediaResolver::from_config(&config)?.with_cancellation(cancel.clone());

        if !opts.no_cache {
            match SqliteCacheStore::open() {
                Ok(store) => resolver = resolver.with_cache(Arc::new(store)),
                Err(e) => warn!("Cache unavailable, continuing without it: {}", e),
            }
        }

        Ok(Self {
            resolver,
            format: opts.format,
            cancel,
        })
    }

    /// Abandon in-flight requests when the user presses Ctrl-C
    pub fn cancel_on_interrupt(&self) {
        let token = self.cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Interrupted, cancelling requests...");
                token.cancel();
            }
        });
    }
}
