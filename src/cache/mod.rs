//! Cache module for storing API responses in memory
//!
//! This module provides an in-memory response cache keyed by request
//! signature, with a configurable TTL (time-to-live). Expired entries are
//! evicted lazily on read; there is no size-based eviction.

mod store;

pub use store::ResponseCache;
