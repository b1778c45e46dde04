//! Cache key generation
//!
//! Keys are readable strings so entries can be inspected with any SQLite
//! client. Each resolution path owns one key shape.

/// Prefix for search-result entries
pub const SEARCH_PREFIX: &str = "search:";

/// Prefix for snippet-detail entries
pub const DETAILS_PREFIX: &str = "details:";

/// Normalize a search query for keying: trimmed and lower-cased
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Key for the IDs returned by one search query
pub fn search_key(query: &str) -> String {
    format!("{}{}", SEARCH_PREFIX, normalize_query(query))
}

/// Key for snippet details of an exact ID list (order matters)
pub fn details_key(ids: &[String]) -> String {
    format!("{}{}", DETAILS_PREFIX, ids.join(","))
}

/// Key for a resolved trailer: the trailer query itself
pub fn trailer_key(query: &str) -> String {
    query.to_string()
}

/// Key for a resolved song list: the first query variant
pub fn songs_key(variants: &[String]) -> Option<String> {
    variants.first().cloned()
}
