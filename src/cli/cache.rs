//! Cache management commands

use reelfinder::cache::SqliteCacheStore;
use reelfinder::{Config, Result};

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::output::formatters::{format_local_time, format_size};

/// Show cache status/statistics
pub fn status(opts: &GlobalOptions) -> Result<()> {
    // Staleness follows the configured window; fall back to defaults
    // when there is no usable config.
    let ttl = Config::load_at(opts.config_ref())
        .map(|c| c.cache_ttl())
        .unwrap_or_else(|_| Config::default().cache_ttl());

    let cache = SqliteCacheStore::open()?;
    let stats = cache.stats(ttl)?;

    match opts.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "total_entries": stats.total_entries,
                "fresh_entries": stats.fresh_entries,
                "stale_entries": stats.stale_entries,
                "total_size_bytes": stats.total_size_bytes,
                "total_size_human": format_size(stats.total_size_bytes),
                "oldest_entry": stats.oldest_entry.map(|t| t.to_rfc3339()),
                "newest_entry": stats.newest_entry.map(|t| t.to_rfc3339()),
                "path": cache.path().display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            println!("Cache Status");
            println!("────────────────────────────────────────");
            println!("Location:       {}", cache.path().display());
            println!("Fresh entries:  {}", stats.fresh_entries);
            println!("Stale:          {}", stats.stale_entries);
            println!("Total size:     {}", format_size(stats.total_size_bytes));

            if let Some(oldest) = stats.oldest_entry {
                println!("Oldest entry:   {}", format_local_time(oldest));
            }
            if let Some(newest) = stats.newest_entry {
                println!("Newest entry:   {}", format_local_time(newest));
            }
        }
    }

    Ok(())
}

/// Clear all cache entries
pub fn clear(format: OutputFormat) -> Result<()> {
    let cache = SqliteCacheStore::open()?;
    let stats = cache.clear_all()?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entries_removed": stats.entries_removed,
                "success": true,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            if stats.entries_removed > 0 {
                println!("Cleared {} cache entries", stats.entries_removed);
            } else {
                println!("Cache was already empty");
            }
        }
    }

    Ok(())
}

/// Show cache path
pub fn path() -> Result<()> {
    let path = SqliteCacheStore::cache_dir()?;
    println!("{}", path.display());
    Ok(())
}
