//! Global CLI options shared across all commands
//!
//! Consolidates the global flags into one struct so handlers take a single
//! parameter instead of one per flag.

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; config file values are merged in
/// `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.reelfinder/config.yaml)
    pub config: Option<String>,

    /// Skip reading and writing the local cache
    pub no_cache: bool,

    /// Custom video API host for development/testing
    pub api_host: Option<String>,

    /// Custom scrape host for development/testing
    pub scrape_host: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            no_cache: cli.no_cache,
            api_host: cli.api_host.clone(),
            scrape_host: cli.scrape_host.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }
}
