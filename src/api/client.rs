//! HTTP client for the question-bank API
//!
//! Wraps `reqwest` with the behavior the browser relies on: cache-first
//! reads, a bounded retry loop with exponential backoff, 429 handling driven
//! by the provider's `Retry-After`, and rate-limit header tracking after
//! every response. Each client instance owns its cache and rate-limit state;
//! nothing here is process-global.

use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Response, StatusCode, Url};
use thiserror::Error;
use tokio::time::sleep;

use crate::api::config::{ApiConfig, CLIENT_USER_AGENT};
use crate::api::rate_limit::{RateLimitInfo, RateLimitTracker};
use crate::api::request::{
    build_question_url, build_questions_url, question_cache_key, QuestionsQuery,
};
use crate::cache::ResponseCache;
use crate::data::{Question, QuestionsPage};

/// Errors surfaced by the API client
///
/// Every variant normalizes to message (`Display`), `status()` and `code()`
/// at the consumer boundary. Superseded requests are not represented here:
/// cancellation is not an error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response other than 429; never retried
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Status text reported by the provider
        message: String,
    },

    /// 429 responses outlasted the retry budget
    #[error("rate limited by the question bank after {attempts} attempts")]
    RateLimited {
        /// Number of attempts actually issued
        attempts: u32,
    },

    /// Network-level failure (timeout, connection error) after retries
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the questions schema; never cached
    #[error("malformed response from question bank: {0}")]
    Malformed(String),

    /// The configured base URL and parameters produced no valid URL;
    /// the message carries the full context from the request builder
    #[error("{0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Returns the HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            ApiError::Malformed(_) | ApiError::InvalidUrl(_) => None,
        }
    }

    /// Returns a stable machine-readable code for this error, if any.
    #[allow(dead_code)]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::Http { .. } => None,
            ApiError::RateLimited { .. } => Some("rate_limited"),
            ApiError::Transport(err) if err.is_timeout() => Some("timeout"),
            ApiError::Transport(_) => Some("network"),
            ApiError::Malformed(_) => Some("malformed_response"),
            ApiError::InvalidUrl(_) => Some("invalid_url"),
        }
    }
}

/// Client for the enem.dev question-bank API
///
/// Construct one instance and share it (`Arc`) between consumers; the cache
/// and the rate-limit snapshot live on the instance so isolated tests and
/// differently-configured clients never interfere.
#[derive(Debug)]
pub struct EnemApiClient {
    /// Underlying HTTP client
    http: reqwest::Client,
    /// Configuration knobs
    config: ApiConfig,
    /// Latest rate-limit snapshot, updated after every response
    rate_limits: RateLimitTracker,
    /// Cached question pages keyed by query signature
    pages: Mutex<ResponseCache<QuestionsPage>>,
    /// Cached single questions keyed by year and index
    questions: Mutex<ResponseCache<Question>>,
}

impl Default for EnemApiClient {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

impl EnemApiClient {
    /// Creates a client with the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            rate_limits: RateLimitTracker::new(),
            pages: Mutex::new(ResponseCache::new(config.cache_ttl)),
            questions: Mutex::new(ResponseCache::new(config.cache_ttl)),
            config,
        }
    }

    /// Creates a client pointed at a custom base URL.
    ///
    /// Used by tests against a local mock server and by proxy deployments.
    #[allow(dead_code)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        })
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetches a page of questions, serving from cache when possible.
    ///
    /// A cache hit returns immediately with no network activity and no
    /// rate-limit update. On a miss the response is fetched with retry,
    /// parsed, cached and returned; failures are never cached.
    pub async fn get_questions(&self, query: &QuestionsQuery) -> Result<QuestionsPage, ApiError> {
        let cache_key = query.cache_key();

        if self.config.enable_cache {
            if let Some(page) = lock(&self.pages).get(&cache_key) {
                return Ok(page);
            }
        }

        let url = build_questions_url(&self.config.base_url, &self.config.origin, query)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let response = self.fetch_with_retry(url).await?;
        let page: QuestionsPage = parse_body(response).await?;

        if self.config.enable_cache {
            lock(&self.pages).insert(cache_key, page.clone());
        }

        Ok(page)
    }

    /// Fetches a single question by exam year and index.
    pub async fn get_question(&self, year: &str, index: u32) -> Result<Question, ApiError> {
        let cache_key = question_cache_key(year, index);

        if self.config.enable_cache {
            if let Some(question) = lock(&self.questions).get(&cache_key) {
                return Ok(question);
            }
        }

        let url = build_question_url(&self.config.base_url, &self.config.origin, year, index)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let response = self.fetch_with_retry(url).await?;
        let question: Question = parse_body(response).await?;

        if self.config.enable_cache {
            lock(&self.questions).insert(cache_key, question.clone());
        }

        Ok(question)
    }

    /// Removes every cached response.
    pub fn clear_cache(&self) {
        lock(&self.pages).clear();
        lock(&self.questions).clear();
    }

    /// Returns the latest rate-limit snapshot, if one was recorded.
    pub fn rate_limit(&self) -> Option<RateLimitInfo> {
        self.rate_limits.read()
    }

    /// Issues a request, retrying transient failures and 429s.
    ///
    /// Bounded loop with the attempt counter as loop state. Rate-limit
    /// headers are recorded after every response, success or failure. 429
    /// waits the server-provided `Retry-After` (base delay when absent);
    /// transport errors back off exponentially. Exhausting the budget
    /// surfaces the terminal error; other non-2xx statuses are never
    /// retried.
    async fn fetch_with_retry(&self, url: Url) -> Result<Response, ApiError> {
        let max_attempts = self.config.retry.max_attempts.max(1);
        let mut attempt: u32 = 1;

        loop {
            let result = self
                .http
                .get(url.clone())
                .timeout(self.config.timeout)
                .header(ACCEPT, "application/json")
                .header(USER_AGENT, CLIENT_USER_AGENT)
                .send()
                .await;

            match result {
                Ok(response) => {
                    self.rate_limits.record(response.headers());

                    let status = response.status();
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        if attempt >= max_attempts {
                            return Err(ApiError::RateLimited { attempts: attempt });
                        }
                        let delay = self
                            .rate_limits
                            .retry_after()
                            .unwrap_or(self.config.retry.base_delay);
                        sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    if !status.is_success() {
                        return Err(ApiError::Http {
                            status: status.as_u16(),
                            message: status
                                .canonical_reason()
                                .unwrap_or("unknown status")
                                .to_string(),
                        });
                    }

                    return Ok(response);
                }
                Err(err) => {
                    if attempt >= max_attempts || !is_retryable(&err) {
                        return Err(ApiError::Transport(err));
                    }
                    sleep(self.config.retry.backoff_delay(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Reads the response body and parses it against the expected schema.
///
/// Parse failures are classified as malformed payloads, distinct from HTTP
/// and transport errors.
async fn parse_body<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Whether a transport-level error is worth another attempt.
///
/// Timeouts and connection failures are transient; everything else (TLS
/// setup, request construction) is not.
fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// Locks a cache mutex, recovering the data from a poisoned lock.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_carries_status_and_text() {
        let err = ApiError::Http {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn test_rate_limited_error_normalizes_to_429() {
        let err = ApiError::RateLimited { attempts: 3 };
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.code(), Some("rate_limited"));
        assert!(err.to_string().contains("3 attempts"));
    }

    #[test]
    fn test_malformed_error_has_no_status() {
        let err = ApiError::Malformed("missing field `metadata`".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.code(), Some("malformed_response"));
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_invalid_url_error() {
        let err = ApiError::InvalidUrl("relative URL without a base".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.code(), Some("invalid_url"));
    }

    #[test]
    fn test_client_default_points_at_provider() {
        let client = EnemApiClient::default();
        assert_eq!(client.config().base_url, "https://api.enem.dev/v1");
        assert!(client.rate_limit().is_none());
    }

    #[test]
    fn test_with_base_url_overrides_only_the_base() {
        let client = EnemApiClient::with_base_url("http://127.0.0.1:9999");
        assert_eq!(client.config().base_url, "http://127.0.0.1:9999");
        assert!(client.config().enable_cache);
    }
}
