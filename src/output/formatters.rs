//! Reusable formatting utilities for CLI output

use chrono::{DateTime, Utc};

/// Format a UTC timestamp in local time, e.g. `2025-01-15 14:30`
pub fn format_local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Format bytes as human-readable size
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Format a duration in hours, e.g. `24h` or `3d`
pub fn format_hours(hours: u64) -> String {
    if hours >= 24 && hours % 24 == 0 {
        format!("{}d", hours / 24)
    } else {
        format!("{}h", hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(24), "1d");
        assert_eq!(format_hours(72), "3d");
        assert_eq!(format_hours(36), "36h");
        assert_eq!(format_hours(6), "6h");
    }

    #[test]
    fn test_format_local_time_shape() {
        let ts = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let formatted = format_local_time(ts);
        assert_eq!(formatted.len(), "2023-11-14 22:13".len());
    }
}
