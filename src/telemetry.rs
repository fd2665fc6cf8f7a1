//! Telemetry metric name constants.
//!
//! Centralised metric names for photoreel operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `photoreel_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `route`: request class: "image", "manifest", "refresh", "unmatched", "invalid_slot"
//! - `outcome`: recache result: "complete", "partial", "catalog_empty"
//! - `status`: slot fetch result: "ok" or "error"

/// Total requests handled by the gateway.
///
/// Labels: `route`.
pub const REQUESTS_TOTAL: &str = "photoreel_requests_total";

/// Total response cache hits.
///
/// Labels: `route` ("image" | "manifest").
pub const CACHE_HITS_TOTAL: &str = "photoreel_cache_hits_total";

/// Total response cache misses.
///
/// Labels: `route` ("image" | "manifest").
pub const CACHE_MISSES_TOTAL: &str = "photoreel_cache_misses_total";

/// Total recache pipeline runs.
///
/// Labels: `outcome`.
pub const RECACHE_TOTAL: &str = "photoreel_recache_total";

/// Recache pipeline duration in seconds (catalog fetch through last store).
pub const RECACHE_DURATION_SECONDS: &str = "photoreel_recache_duration_seconds";

/// Total per-slot image fetches.
///
/// Labels: `status` ("ok" | "error").
pub const SLOT_FETCH_TOTAL: &str = "photoreel_slot_fetch_total";

/// Number of eligible photos returned by the last catalog query.
pub const CATALOG_PHOTOS: &str = "photoreel_catalog_photos";
