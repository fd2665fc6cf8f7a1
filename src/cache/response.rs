//! In-memory response cache.
//!
//! [`ResponseCache`] stores [`CachedResponse`]s under a [`CacheKey`] built
//! from the request method and path. Writes come only from the recache
//! pipeline; the router only reads.
//!
//! # Concurrency
//!
//! Concurrent recaches may write the same key. moka resolves that as
//! last-writer-wins per key, and each value is replaced atomically, so a
//! reader sees either the old response or the new one, never a mix.

use std::time::Duration;

use bytes::Bytes;
use moka::future::Cache;

/// Default cache namespace.
pub const DEFAULT_CACHE_NAME: &str = "flickr-images-cache-v1";

/// Default freshness window: one day.
pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

/// Configuration for the response cache.
///
/// ```rust
/// # use photoreel::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .name("photos-v2")
///     .ttl(Duration::from_secs(3600));
/// assert_eq!(config.cache_control(), "max-age=3600");
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Cache namespace. Default: `flickr-images-cache-v1`.
    pub name: String,
    /// Time-to-live for cached entries. Default: 86400 seconds.
    pub ttl: Duration,
    /// Maximum number of cached entries. Default: 7 (six slots plus the manifest).
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CACHE_NAME.to_string(),
            ttl: DEFAULT_TTL,
            max_entries: 7,
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache namespace.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Size the cache for `slots` images plus one manifest entry.
    pub fn slots(mut self, slots: u32) -> Self {
        self.max_entries = u64::from(slots) + 1;
        self
    }

    /// `Cache-Control` value advertised on every cached response.
    pub fn cache_control(&self) -> String {
        format!("max-age={}", self.ttl.as_secs())
    }
}

/// Normalized request identity.
///
/// The method is uppercased and `HEAD` folds into `GET`. Query string and
/// fragment are dropped from the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: String,
    path: String,
}

impl CacheKey {
    /// Build a key from a request method and URI path.
    pub fn new(method: &str, path: &str) -> Self {
        let method = method.to_ascii_uppercase();
        let method = if method == "HEAD" {
            "GET".to_string()
        } else {
            method
        };
        let path = path
            .split(['?', '#'])
            .next()
            .filter(|p| !p.is_empty())
            .unwrap_or("/")
            .to_string();
        Self { method, path }
    }

    /// Key for a `GET` of `path`.
    pub fn get(path: &str) -> Self {
        Self::new("GET", path)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A stored HTTP response, replayed verbatim on cache hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl CachedResponse {
    /// Create a `200 OK` response with the given content type.
    pub fn ok(content_type: &str, body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".to_string(), content_type.to_string())],
            body: body.into(),
        }
    }

    /// Set a header, replacing any existing value (names compare case-insensitively).
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    /// Look up a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// In-memory TTL cache of HTTP responses.
pub struct ResponseCache {
    cache: Cache<CacheKey, CachedResponse>,
    config: CacheConfig,
}

impl ResponseCache {
    /// Create a new response cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .name(&config.name)
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self {
            cache,
            config: config.clone(),
        }
    }

    /// Look up a response. Returns `None` on miss or expiry.
    pub async fn get(&self, key: &CacheKey) -> Option<CachedResponse> {
        self.cache.get(key).await
    }

    /// Store (or overwrite) a response.
    pub async fn insert(&self, key: CacheKey, response: CachedResponse) {
        self.cache.insert(key, response).await;
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// `Cache-Control` value for responses stored in this cache.
    pub fn cache_control(&self) -> String {
        self.config.cache_control()
    }
}
