//! Cache-busting timestamps.
//!
//! Rebuilt assets get a `?t=<unix-seconds>` query so browsers re-fetch them.
//! The query is never part of the file name on disk.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch (0 if the clock is before it).
pub fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// `?t=<now>` when `enabled`, empty otherwise.
pub fn timestamp_query(enabled: bool) -> String {
    if enabled {
        format!("?t={}", unix_seconds())
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_query_disabled() {
        assert_eq!(timestamp_query(false), "");
    }

    #[test]
    fn test_timestamp_query_enabled() {
        let query = timestamp_query(true);
        let secs: u64 = query.strip_prefix("?t=").unwrap().parse().unwrap();
        assert!(secs > 1_600_000_000);
    }
}
