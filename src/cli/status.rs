//! Status command implementation

use colored::Colorize;

use reelfinder::cache::SqliteCacheStore;
use reelfinder::credentials::mask_key;
use reelfinder::{Config, Result};

use crate::cli::args::GlobalOptions;
use crate::output::formatters::format_hours;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "reelfinder Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;

    match Config::load_at(opts.config_ref()) {
        Ok(config) => {
            if config_path.exists() {
                println!("Config file: {}", config_path.display().to_string().cyan());
            } else {
                println!(
                    "Config file: {} {}",
                    config_path.display().to_string().dimmed(),
                    "(not present, using environment)".dimmed()
                );
            }
            println!();

            let keys: Vec<&String> = config.api_keys.iter().filter(|k| !k.trim().is_empty()).collect();
            println!("{} {} API key(s) configured", "✓".green(), keys.len());
            for (i, key) in keys.iter().enumerate() {
                let marker = if i == 0 { "(first)".green() } else { "".normal() };
                println!("  #{} {} {}", i + 1, mask_key(key), marker);
            }

            println!(
                "{} Search hints: region {}, language {}",
                "○".dimmed(),
                config.region_code,
                config.relevance_language
            );

            let trailer_ttl = config
                .trailer_cache_ttl_hours
                .map(format_hours)
                .unwrap_or_else(|| "never expires".to_string());
            println!(
                "{} Cache freshness: searches {}, trailers {}",
                "○".dimmed(),
                format_hours(config.cache_ttl_hours),
                trailer_ttl
            );

            if let Some(ref host) = config.api_host {
                println!("{} Custom API host: {}", "○".dimmed(), host.cyan());
            }
            if let Some(ref host) = config.scrape_host {
                println!("{} Custom scrape host: {}", "○".dimmed(), host.cyan());
            }
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            println!();
            println!(
                "Create {} with an {} list, or set {}.",
                config_path.display().to_string().cyan(),
                "api_keys".cyan(),
                reelfinder::config::API_KEYS_ENV.cyan()
            );
        }
    }

    println!();
    match SqliteCacheStore::cache_dir() {
        Ok(dir) if opts.no_cache => {
            println!("Cache: {} {}", dir.display(), "(disabled for this run)".dimmed())
        }
        Ok(dir) => println!("Cache: {}", dir.display().to_string().cyan()),
        Err(_) => println!("{} Cache directory unavailable", "⚠".yellow()),
    }
    println!();

    Ok(())
}
