//! Rate-limit header tracking
//!
//! The provider reports its quota through `X-RateLimit-*` response headers.
//! The tracker keeps the most recent complete snapshot so callers can show
//! remaining quota and pick the 429 retry delay.

use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;

use crate::api::config::{
    HEADER_RATE_LIMIT, HEADER_RATE_REMAINING, HEADER_RATE_RESET, HEADER_RETRY_AFTER,
};

/// One snapshot of the provider's rate-limit headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Request quota per window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// Unix timestamp (seconds) at which the window resets
    pub reset: u64,
    /// Seconds to wait before retrying, sent alongside 429 responses
    pub retry_after: Option<u64>,
}

impl RateLimitInfo {
    /// Returns the reset time as a UTC timestamp, when representable.
    #[allow(dead_code)]
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.reset as i64, 0).single()
    }

    /// Returns true when the quota for the current window is used up.
    #[allow(dead_code)]
    pub fn exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Last-writer-wins store of the most recent rate-limit snapshot
///
/// Snapshots are recorded after every response, success or failure. The
/// update is all-or-nothing: unless all three mandatory headers are present
/// and parse as integers, the previous snapshot is left untouched.
#[derive(Debug, Default)]
pub struct RateLimitTracker {
    info: Mutex<Option<RateLimitInfo>>,
}

impl RateLimitTracker {
    /// Creates a tracker with no snapshot recorded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the rate-limit headers of a response.
    ///
    /// `Retry-After` rides along when present but is never required.
    pub fn record(&self, headers: &HeaderMap) {
        let limit = parse_header::<u32>(headers, HEADER_RATE_LIMIT);
        let remaining = parse_header::<u32>(headers, HEADER_RATE_REMAINING);
        let reset = parse_header::<u64>(headers, HEADER_RATE_RESET);
        let retry_after = parse_header::<u64>(headers, HEADER_RETRY_AFTER);

        if let (Some(limit), Some(remaining), Some(reset)) = (limit, remaining, reset) {
            let mut guard = self.info.lock().unwrap_or_else(PoisonError::into_inner);
            *guard = Some(RateLimitInfo {
                limit,
                remaining,
                reset,
                retry_after,
            });
        }
    }

    /// Returns the most recent snapshot, if any response carried one.
    pub fn read(&self) -> Option<RateLimitInfo> {
        *self.info.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the server-provided retry delay from the latest snapshot.
    pub fn retry_after(&self) -> Option<Duration> {
        self.read()
            .and_then(|info| info.retry_after)
            .map(Duration::from_secs)
    }
}

/// Parses a header value as an integer, treating anything else as absent.
fn parse_header<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(entries: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in entries {
            map.insert(*name, HeaderValue::from_str(value).expect("header value"));
        }
        map
    }

    #[test]
    fn test_read_is_none_before_any_record() {
        let tracker = RateLimitTracker::new();
        assert!(tracker.read().is_none());
        assert!(tracker.retry_after().is_none());
    }

    #[test]
    fn test_record_with_all_mandatory_headers() {
        let tracker = RateLimitTracker::new();
        tracker.record(&headers(&[
            ("x-ratelimit-limit", "100"),
            ("x-ratelimit-remaining", "42"),
            ("x-ratelimit-reset", "1700000000"),
        ]));

        let info = tracker.read().expect("snapshot recorded");
        assert_eq!(info.limit, 100);
        assert_eq!(info.remaining, 42);
        assert_eq!(info.reset, 1_700_000_000);
        assert!(info.retry_after.is_none());
    }

    #[test]
    fn test_retry_after_rides_along() {
        let tracker = RateLimitTracker::new();
        tracker.record(&headers(&[
            ("x-ratelimit-limit", "100"),
            ("x-ratelimit-remaining", "0"),
            ("x-ratelimit-reset", "1700000000"),
            ("retry-after", "7"),
        ]));

        let info = tracker.read().expect("snapshot recorded");
        assert_eq!(info.retry_after, Some(7));
        assert_eq!(tracker.retry_after(), Some(Duration::from_secs(7)));
        assert!(info.exhausted());
    }

    #[test]
    fn test_missing_mandatory_header_preserves_previous_snapshot() {
        let tracker = RateLimitTracker::new();
        tracker.record(&headers(&[
            ("x-ratelimit-limit", "100"),
            ("x-ratelimit-remaining", "42"),
            ("x-ratelimit-reset", "1700000000"),
        ]));

        // Reset header missing: the update must not happen, even partially
        tracker.record(&headers(&[
            ("x-ratelimit-limit", "100"),
            ("x-ratelimit-remaining", "41"),
        ]));

        let info = tracker.read().expect("snapshot still present");
        assert_eq!(info.remaining, 42);
    }

    #[test]
    fn test_non_integer_header_preserves_previous_snapshot() {
        let tracker = RateLimitTracker::new();
        tracker.record(&headers(&[
            ("x-ratelimit-limit", "100"),
            ("x-ratelimit-remaining", "42"),
            ("x-ratelimit-reset", "1700000000"),
        ]));

        tracker.record(&headers(&[
            ("x-ratelimit-limit", "abc"),
            ("x-ratelimit-remaining", "41"),
            ("x-ratelimit-reset", "1700000100"),
        ]));

        let info = tracker.read().expect("snapshot still present");
        assert_eq!(info.limit, 100);
        assert_eq!(info.remaining, 42);
    }

    #[test]
    fn test_last_writer_wins() {
        let tracker = RateLimitTracker::new();
        tracker.record(&headers(&[
            ("x-ratelimit-limit", "100"),
            ("x-ratelimit-remaining", "42"),
            ("x-ratelimit-reset", "1700000000"),
        ]));
        tracker.record(&headers(&[
            ("x-ratelimit-limit", "100"),
            ("x-ratelimit-remaining", "41"),
            ("x-ratelimit-reset", "1700000060"),
        ]));

        let info = tracker.read().expect("snapshot recorded");
        assert_eq!(info.remaining, 41);
        assert_eq!(info.reset, 1_700_000_060);
    }

    #[test]
    fn test_retry_after_alone_does_not_create_a_snapshot() {
        let tracker = RateLimitTracker::new();
        tracker.record(&headers(&[("retry-after", "7")]));
        assert!(tracker.read().is_none());
        assert!(tracker.retry_after().is_none());
    }

    #[test]
    fn test_reset_at_converts_to_utc() {
        let info = RateLimitInfo {
            limit: 10,
            remaining: 5,
            reset: 1_700_000_000,
            retry_after: None,
        };
        let at = info.reset_at().expect("representable timestamp");
        assert_eq!(at.timestamp(), 1_700_000_000);
    }
}
