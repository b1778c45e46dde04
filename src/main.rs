//! reelfinder CLI - find playable trailers and soundtrack videos for movies

use clap::Parser;

mod cli;
mod output;

use cli::{CacheCommands, Cli, Commands};
use cli::args::GlobalOptions;
use reelfinder::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// Route `log` output to stderr; `--debug` forces debug level for this crate
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module("reelfinder", log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Trailer { movie } => cli::resolve::trailer(&opts, &movie).await,
        Commands::Songs { movie, limit } => cli::resolve::songs(&opts, &movie, limit).await,
        Commands::Media { movie, song_limit } => {
            cli::resolve::media(&opts, &movie, song_limit).await
        }
        Commands::Status => cli::status::run(&opts),
        Commands::Cache(cache_cmd) => match cache_cmd {
            CacheCommands::Status => cli::cache::status(&opts),
            CacheCommands::Clear => cli::cache::clear(opts.format),
            CacheCommands::Path => cli::cache::path(),
        },
    }
}
