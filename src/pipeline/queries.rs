//! Search query construction

/// Song query phrasings, in priority order. The first one also keys the
/// song cache and feeds the scrape fallback.
pub const SONG_VARIANTS: [&str; 5] = [
    "song",
    "official song",
    "full album",
    "soundtrack",
    "official audio",
];

/// Language used when a movie lists none
pub const DEFAULT_LANGUAGE: &str = "English";

fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"<title> <year> official trailer <language>"`, skipping blank parts
pub fn trailer_query(title: &str, year: &str, language: &str) -> String {
    join_parts(&[title, year, "official trailer", language])
}

/// One query per [`SONG_VARIANTS`] entry, in the same order
pub fn song_queries(title: &str, year: &str, language: &str) -> Vec<String> {
    SONG_VARIANTS
        .iter()
        .map(|variant| join_parts(&[title, year, variant, language]))
        .collect()
}

/// First entry of a comma-separated language list such as `"Hindi, English"`
pub fn primary_language(languages: &str) -> String {
    languages
        .split(',')
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string()
}
