//! Client for the enem.dev question-bank API
//!
//! This module contains everything that talks to the provider: request
//! building, the retrying HTTP client, rate-limit header tracking and the
//! configuration knobs shared between them.

pub mod client;
pub mod config;
pub mod rate_limit;
pub mod request;

pub use client::{ApiError, EnemApiClient};
#[allow(unused_imports)]
pub use config::{ApiConfig, RetryConfig};
pub use rate_limit::RateLimitInfo;
#[allow(unused_imports)]
pub use rate_limit::RateLimitTracker;
#[allow(unused_imports)]
pub use request::{build_question_url, build_questions_url};
pub use request::QuestionsQuery;
