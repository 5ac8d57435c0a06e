//! Request building for the question-bank API
//!
//! Assembles fully-qualified, percent-encoded URLs from a base endpoint and
//! a parameter set, and derives the deterministic cache keys the response
//! cache is indexed by.

use reqwest::Url;
use thiserror::Error;

use crate::api::config::{DEFAULT_LIMIT, DEFAULT_YEAR, MAX_LIMIT};
use crate::data::{Discipline, Language};

/// Error raised when a request URL cannot be assembled
#[derive(Debug, Error)]
#[error("invalid request URL: {0}")]
pub struct UrlBuildError(String);

/// Parameters of a questions-page request
///
/// Immutable once handed to the client for a given call. `limit` is clamped
/// to the provider maximum when the URL and cache key are derived, so a
/// too-large value and the maximum are the same request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionsQuery {
    /// Exam year, e.g. "2023"
    pub year: String,
    /// Requested page size (effective value is clamped to 50)
    pub limit: u32,
    /// Offset of the first question to return
    pub offset: u32,
    /// Optional foreign-language filter
    pub language: Option<Language>,
    /// Optional subject-area filter
    pub discipline: Option<Discipline>,
}

impl Default for QuestionsQuery {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR.to_string(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            language: None,
            discipline: None,
        }
    }
}

impl QuestionsQuery {
    /// Creates a query for the given exam year with default paging.
    #[allow(dead_code)]
    pub fn new(year: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            ..Self::default()
        }
    }

    /// Sets the requested page size.
    #[allow(dead_code)]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the page offset.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the foreign-language filter.
    #[allow(dead_code)]
    pub fn with_language(mut self, language: Option<Language>) -> Self {
        self.language = language;
        self
    }

    /// Sets the subject-area filter.
    #[allow(dead_code)]
    pub fn with_discipline(mut self, discipline: Option<Discipline>) -> Self {
        self.discipline = discipline;
        self
    }

    /// Returns the page size actually sent to the provider.
    ///
    /// Values above the documented maximum are silently truncated, never
    /// rejected.
    pub fn effective_limit(&self) -> u32 {
        self.limit.min(MAX_LIMIT)
    }

    /// Derives the cache key for this query.
    ///
    /// Deterministic over every field that affects the response content:
    /// equal effective parameters give equal keys, any differing field
    /// changes the key.
    pub fn cache_key(&self) -> String {
        format!(
            "questions_{}_{}_{}_{}_{}",
            self.year,
            self.effective_limit(),
            self.offset,
            self.language.map(|l| l.as_str()).unwrap_or("all"),
            self.discipline.map(|d| d.as_str()).unwrap_or("all"),
        )
    }
}

/// Derives the cache key for a single-question request.
pub fn question_cache_key(year: &str, index: u32) -> String {
    format!("question_{}_{}", year, index)
}

/// Resolves a possibly-relative base URL against the configured origin.
///
/// A base starting with `/` addresses a same-origin proxy and is prefixed
/// with the origin; anything else is taken as an absolute URL.
fn resolve_base(base_url: &str, origin: &str) -> String {
    if base_url.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), base_url)
    } else {
        base_url.trim_end_matches('/').to_string()
    }
}

/// Builds the URL of a questions-page request.
///
/// Path shape: `{base}/exams/{year}/questions` with `limit`, `offset` and
/// the optional `language`/`discipline` filters as query parameters. Absent
/// filters emit no parameter at all.
pub fn build_questions_url(
    base_url: &str,
    origin: &str,
    query: &QuestionsQuery,
) -> Result<Url, UrlBuildError> {
    let endpoint = format!(
        "{}/exams/{}/questions",
        resolve_base(base_url, origin),
        query.year
    );
    let mut url = Url::parse(&endpoint).map_err(|e| UrlBuildError(e.to_string()))?;

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("limit", &query.effective_limit().to_string());
        pairs.append_pair("offset", &query.offset.to_string());
        if let Some(language) = query.language {
            pairs.append_pair("language", language.as_str());
        }
        if let Some(discipline) = query.discipline {
            pairs.append_pair("discipline", discipline.as_str());
        }
    }

    Ok(url)
}

/// Builds the URL of a single-question request.
pub fn build_question_url(
    base_url: &str,
    origin: &str,
    year: &str,
    index: u32,
) -> Result<Url, UrlBuildError> {
    let endpoint = format!(
        "{}/exams/{}/questions/{}",
        resolve_base(base_url, origin),
        year,
        index
    );
    Url::parse(&endpoint).map_err(|e| UrlBuildError(e.to_string()))
}
