//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod args;
pub mod cache;
pub mod context;
pub mod resolve;
pub mod status;

pub use args::{MovieArgs, OutputFormat};
pub use context::CommandContext;

/// reelfinder - find playable trailers and soundtrack videos for movies
#[derive(Parser, Debug)]
#[command(name = "reelfinder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "REELFINDER_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "REELFINDER_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "REELFINDER_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass the local cache for this run
    #[arg(long, global = true, env = "REELFINDER_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// Video API base URL (development/testing)
    #[arg(long, global = true, env = "REELFINDER_API_HOST", hide = true)]
    pub api_host: Option<String>,

    /// Scrape target base URL (development/testing)
    #[arg(long, global = true, env = "REELFINDER_SCRAPE_HOST", hide = true)]
    pub scrape_host: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find the trailer for a movie
    #[command(after_help = "\
Examples:
  reelfinder trailer Inception --year 2010
  reelfinder trailer RRR --year 2022 --lang \"Telugu, Hindi\"")]
    Trailer {
        #[command(flatten)]
        movie: MovieArgs,
    },

    /// Find soundtrack songs for a movie
    Songs {
        #[command(flatten)]
        movie: MovieArgs,

        /// Maximum number of songs to return
        #[arg(long, short = 'n', default_value_t = reelfinder::DEFAULT_SONG_LIMIT)]
        limit: usize,
    },

    /// Find the trailer and songs for a movie in one go
    Media {
        #[command(flatten)]
        movie: MovieArgs,

        /// Maximum number of songs to return
        #[arg(long, default_value_t = reelfinder::DEFAULT_SONG_LIMIT)]
        song_limit: usize,
    },

    /// Show configuration, API key and cache status
    Status,

    /// Manage local result cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,
    /// Clear all cached data
    Clear,
    /// Print cache directory path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_songs_with_limit() {
        let cli = Cli::try_parse_from([
            "reelfinder",
            "songs",
            "Inception",
            "--year",
            "2010",
            "-n",
            "3",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Songs { movie, limit } => {
                assert_eq!(movie.title, "Inception");
                assert_eq!(movie.year.as_deref(), Some("2010"));
                assert_eq!(limit, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn test_media_default_song_limit() {
        let cli = Cli::try_parse_from(["reelfinder", "media", "Up"]).unwrap();
        match cli.command {
            Commands::Media { song_limit, .. } => assert_eq!(song_limit, 10),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_title_is_required() {
        assert!(Cli::try_parse_from(["reelfinder", "trailer"]).is_err());
    }
}
