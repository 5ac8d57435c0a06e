//! Configuration for the enem.dev API client

use std::time::Duration;

/// Default base URL of the question-bank provider
pub const DEFAULT_BASE_URL: &str = "https://api.enem.dev/v1";

/// Origin used to resolve relative base URLs (same-origin proxy setups)
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Descriptive client identifier sent with every request
pub const CLIENT_USER_AGENT: &str = concat!("enembank/", env!("CARGO_PKG_VERSION"));

/// Maximum page size the provider accepts; larger values are clamped
pub const MAX_LIMIT: u32 = 50;

/// Page size used when the caller does not pick one
pub const DEFAULT_LIMIT: u32 = 10;

/// Exam year used when the caller does not pick one
pub const DEFAULT_YEAR: &str = "2023";

/// Response header carrying the request quota
pub const HEADER_RATE_LIMIT: &str = "X-RateLimit-Limit";

/// Response header carrying the remaining quota
pub const HEADER_RATE_REMAINING: &str = "X-RateLimit-Remaining";

/// Response header carrying the quota reset time (unix seconds)
pub const HEADER_RATE_RESET: &str = "X-RateLimit-Reset";

/// Response header carrying the 429 retry delay (seconds)
pub const HEADER_RETRY_AFTER: &str = "Retry-After";

/// Retry and backoff policy for transient failures
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts per logical request
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound on any single backoff delay
    pub max_delay: Duration,
    /// Multiplier applied to the delay on each further attempt
    pub backoff_factor: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            backoff_factor: 2,
        }
    }
}

impl RetryConfig {
    /// Returns the backoff delay before retrying after `attempt` failures.
    ///
    /// Grows as `base_delay * backoff_factor^(attempt - 1)`, capped at
    /// `max_delay`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let factor = self.backoff_factor.saturating_pow(exponent);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Configuration for `EnemApiClient`
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Provider base URL; a leading `/` marks it relative to `origin`
    pub base_url: String,
    /// Origin prepended to relative base URLs
    pub origin: String,
    /// Per-request timeout; a timed-out call is cancelled and may be retried
    pub timeout: Duration,
    /// How long cached responses stay fresh
    pub cache_ttl: Duration,
    /// Whether responses are cached at all
    pub enable_cache: bool,
    /// Retry/backoff policy
    pub retry: RetryConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(5 * 60),
            enable_cache: true,
            retry: RetryConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://api.enem.dev/v1");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert!(config.enable_cache);
    }

    #[test]
    fn test_retry_config_defaults() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.base_delay, Duration::from_millis(1000));
        assert_eq!(retry.max_delay, Duration::from_millis(10_000));
        assert_eq!(retry.backoff_factor, 2);
    }

    #[test]
    fn test_backoff_delay_doubles_per_attempt() {
        let retry = RetryConfig::default();
        assert_eq!(retry.backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(retry.backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(retry.backoff_delay(3), Duration::from_millis(4000));
        assert_eq!(retry.backoff_delay(4), Duration::from_millis(8000));
    }

    #[test]
    fn test_backoff_delay_is_capped_at_max_delay() {
        let retry = RetryConfig::default();
        assert_eq!(retry.backoff_delay(5), Duration::from_millis(10_000));
        assert_eq!(retry.backoff_delay(12), Duration::from_millis(10_000));
    }

    #[test]
    fn test_backoff_delay_huge_attempt_does_not_overflow() {
        let retry = RetryConfig::default();
        assert_eq!(retry.backoff_delay(u32::MAX), retry.max_delay);
    }
}
