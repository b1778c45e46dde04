//! Trailer, songs and media commands

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, MovieArgs, OutputFormat};
use crate::output::{json, table};
use reelfinder::{MovieMedia, Result, VideoCandidate};

/// Trailer lookup result for table and JSON output
#[derive(Tabled, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrailerDisplay {
    #[tabled(rename = "TITLE")]
    title: String,

    #[tabled(rename = "YEAR")]
    year: String,

    #[tabled(rename = "EMBED URL", display = "display_url")]
    embed_url: Option<String>,
}

/// Display format for songs in table view
#[derive(Tabled)]
struct SongDisplay {
    #[tabled(rename = "#")]
    rank: usize,

    #[tabled(rename = "TITLE")]
    title: String,

    #[tabled(rename = "CHANNEL")]
    channel: String,

    #[tabled(rename = "VIDEO ID")]
    id: String,

    #[tabled(rename = "EMBED URL")]
    embed_url: String,
}

fn display_url(url: &Option<String>) -> String {
    url.clone().unwrap_or_else(|| "-".to_string())
}

fn song_rows(songs: &[VideoCandidate]) -> Vec<SongDisplay> {
    songs
        .iter()
        .enumerate()
        .map(|(i, song)| SongDisplay {
            rank: i + 1,
            title: song.title.clone(),
            channel: song.channel.clone(),
            id: song.id.clone(),
            embed_url: song.embed_url.clone(),
        })
        .collect()
}

fn heading(movie: &MovieArgs) -> String {
    match movie.year.as_deref() {
        Some(year) if !year.trim().is_empty() => format!("{} ({})", movie.title, year.trim()),
        _ => movie.title.clone(),
    }
}

/// Run the trailer command
pub async fn trailer(opts: &GlobalOptions, movie: &MovieArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.cancel_on_interrupt();

    let embed_url = ctx
        .resolver
        .resolve_trailer(&movie.title, movie.year(), &movie.language())
        .await;

    let display = TrailerDisplay {
        title: movie.title.clone(),
        year: movie.year().to_string(),
        embed_url,
    };

    match ctx.format {
        OutputFormat::Pretty => print_trailer_pretty(movie, display.embed_url.as_deref()),
        OutputFormat::Table => println!("{}", table::format_table(&[display])),
        OutputFormat::Json => println!("{}", json::format_json(&display)?),
    }

    Ok(())
}

/// Run the songs command
pub async fn songs(opts: &GlobalOptions, movie: &MovieArgs, limit: usize) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.cancel_on_interrupt();

    let songs = ctx
        .resolver
        .resolve_songs(&movie.title, movie.year(), &movie.language(), limit)
        .await;

    match ctx.format {
        OutputFormat::Pretty => print_songs_pretty(movie, &songs),
        OutputFormat::Table => println!("{}", table::format_table(&song_rows(&songs))),
        OutputFormat::Json => println!("{}", json::format_json(&songs)?),
    }

    Ok(())
}

/// Run the media command (trailer and songs concurrently)
pub async fn media(opts: &GlobalOptions, movie: &MovieArgs, song_limit: usize) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.cancel_on_interrupt();

    let media: MovieMedia = ctx
        .resolver
        .resolve_media(&movie.title, movie.year(), &movie.language(), song_limit)
        .await;

    match ctx.format {
        OutputFormat::Pretty => {
            print_trailer_pretty(movie, media.trailer_embed_url.as_deref());
            println!();
            print_songs_pretty(movie, &media.songs);
        }
        OutputFormat::Table => {
            println!("Trailer: {}", display_url(&media.trailer_embed_url));
            println!("{}", table::format_table(&song_rows(&media.songs)));
        }
        OutputFormat::Json => println!("{}", json::format_json(&media)?),
    }

    Ok(())
}

fn print_trailer_pretty(movie: &MovieArgs, embed_url: Option<&str>) {
    match embed_url {
        Some(url) => {
            println!("{} {}", "Trailer".bold(), heading(movie).dimmed());
            println!("  {} {}", "✓".green(), url.cyan());
        }
        None => println!(
            "{} No playable trailer found for {}",
            "✗".red(),
            heading(movie)
        ),
    }
}

fn print_songs_pretty(movie: &MovieArgs, songs: &[VideoCandidate]) {
    if songs.is_empty() {
        println!("{} No songs found for {}", "✗".red(), heading(movie));
        return;
    }

    println!("{} {}", "Songs".bold(), heading(movie).dimmed());
    for (i, song) in songs.iter().enumerate() {
        println!(
            "  {:>2}. {} {}",
            i + 1,
            song.title,
            format!("({})", song.channel).dimmed()
        );
        println!("      {}", song.embed_url.cyan());
    }
}
