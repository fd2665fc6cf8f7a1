//! Response cache for rotation images and the manifest.
//!
//! The gateway keeps whole HTTP responses (status, headers, body) keyed by
//! normalized request identity. Entries expire after a fixed TTL and there
//! is no other eviction path: a stale rotation keeps being served until its
//! TTL runs out or a refresh overwrites it.

pub mod response;

pub use response::{CacheConfig, CacheKey, CachedResponse, ResponseCache};
