//! Embeddability filter over detail-lookup results

use std::collections::HashMap;

use crate::client::VideoMetadata;

/// Whether a video can be played in an embedded player anywhere
pub fn is_playable(meta: &VideoMetadata) -> bool {
    meta.embeddable
        && meta.privacy_status.eq_ignore_ascii_case("public")
        && meta.region_blocked.is_empty()
}

/// Keep the candidates whose metadata passes [`is_playable`].
///
/// Output order follows `candidates`. IDs missing from `metadata` are dropped.
pub fn filter_embeddable(metadata: &[VideoMetadata], candidates: &[String]) -> Vec<String> {
    let by_id: HashMap<&str, &VideoMetadata> =
        metadata.iter().map(|m| (m.id.as_str(), m)).collect();

    candidates
        .iter()
        .filter(|id| by_id.get(id.as_str()).is_some_and(|m| is_playable(m)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str, embeddable: bool, privacy: &str, blocked: &[&str]) -> VideoMetadata {
        VideoMetadata {
            id: id.to_string(),
            embeddable,
            privacy_status: privacy.to_string(),
            region_blocked: blocked.iter().map(|s| s.to_string()).collect(),
            ..VideoMetadata::default()
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_excludes_each_failing_condition() {
        let metadata = vec![
            meta("ok", true, "public", &[]),
            meta("noembed", false, "public", &[]),
            meta("private", true, "private", &[]),
            meta("unlisted", true, "unlisted", &[]),
            meta("blocked", true, "public", &["IN"]),
        ];
        let candidates = ids(&["ok", "noembed", "private", "unlisted", "blocked"]);

        assert_eq!(filter_embeddable(&metadata, &candidates), ids(&["ok"]));
    }

    #[test]
    fn test_privacy_is_case_insensitive() {
        let metadata = vec![meta("a", true, "PUBLIC", &[]), meta("b", true, "Public", &[])];
        assert_eq!(
            filter_embeddable(&metadata, &ids(&["a", "b"])),
            ids(&["a", "b"])
        );
    }

    #[test]
    fn test_preserves_candidate_order() {
        // Metadata order differs from candidate order
        let metadata = vec![
            meta("c", true, "public", &[]),
            meta("a", true, "public", &[]),
            meta("b", true, "public", &[]),
        ];
        assert_eq!(
            filter_embeddable(&metadata, &ids(&["a", "b", "c"])),
            ids(&["a", "b", "c"])
        );
    }

    #[test]
    fn test_missing_metadata_fails() {
        let metadata = vec![meta("a", true, "public", &[])];
        assert_eq!(
            filter_embeddable(&metadata, &ids(&["gone", "a"])),
            ids(&["a"])
        );
    }

    #[test]
    fn test_output_is_subsequence() {
        let metadata = vec![
            meta("a", true, "public", &[]),
            meta("b", false, "public", &[]),
            meta("c", true, "public", &[]),
        ];
        let candidates = ids(&["a", "b", "c", "x"]);
        let out = filter_embeddable(&metadata, &candidates);

        let mut rest = candidates.iter();
        for id in &out {
            assert!(rest.any(|c| c == id), "{} out of order or invented", id);
        }
        assert!(out.len() <= candidates.len());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(filter_embeddable(&[], &ids(&["a"])).is_empty());
        assert!(filter_embeddable(&[meta("a", true, "public", &[])], &[]).is_empty());
    }
}
