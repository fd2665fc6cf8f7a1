//! Immutable gateway configuration.

use std::num::NonZeroU32;

use crate::cache::CacheConfig;
use crate::types::{MissingSlotPolicy, Slot};
use crate::{PhotoreelError, Result};

/// Default number of rotation slots.
pub const DEFAULT_IMAGE_COUNT: NonZeroU32 = NonZeroU32::new(6).unwrap();

/// Default manifest route.
pub const DEFAULT_MANIFEST_PATH: &str = "/photos.json";

/// Default manual refresh route.
pub const DEFAULT_REFRESH_PATH: &str = "/update-cache";

/// Everything the gateway needs to decide how to answer a request.
///
/// Built once (see [`PhotoreelBuilder`](crate::PhotoreelBuilder)) and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Number of slots `N`; valid image paths are `/1.jpg` through `/{N}.jpg`.
    pub image_count: NonZeroU32,
    /// Redirect target for unmatched paths (and missing slots, by default).
    pub fallback_domain: String,
    pub manifest_path: String,
    pub refresh_path: String,
    pub missing_slot_policy: MissingSlotPolicy,
    pub cache: CacheConfig,
}

impl GatewayConfig {
    /// Config with defaults for everything except the fallback domain.
    pub fn new(fallback_domain: impl Into<String>) -> Self {
        Self {
            image_count: DEFAULT_IMAGE_COUNT,
            fallback_domain: fallback_domain.into(),
            manifest_path: DEFAULT_MANIFEST_PATH.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            missing_slot_policy: MissingSlotPolicy::default(),
            cache: CacheConfig::new().slots(DEFAULT_IMAGE_COUNT.get()),
        }
    }

    /// Reject configurations the router could not serve consistently.
    pub fn validate(&self) -> Result<()> {
        let domain = self.fallback_domain.trim();
        if domain.is_empty() {
            return Err(PhotoreelError::Configuration(
                "fallback domain must not be empty".into(),
            ));
        }
        if !(domain.starts_with("http://") || domain.starts_with("https://")) {
            return Err(PhotoreelError::Configuration(format!(
                "fallback domain must be an absolute http(s) URL, got {domain:?}"
            )));
        }
        for (name, path) in [
            ("manifest_path", &self.manifest_path),
            ("refresh_path", &self.refresh_path),
        ] {
            if !path.starts_with('/') {
                return Err(PhotoreelError::Configuration(format!(
                    "{name} must start with '/', got {path:?}"
                )));
            }
        }
        if self.manifest_path == self.refresh_path {
            return Err(PhotoreelError::Configuration(
                "manifest_path and refresh_path must differ".into(),
            ));
        }
        if self.cache.ttl.is_zero() {
            return Err(PhotoreelError::Configuration("cache ttl must be positive".into()));
        }
        Ok(())
    }

    /// Redirect target for a slot that could not be served from cache.
    pub fn fallback_for(&self, slot: Slot) -> String {
        format!("{}{}", self.fallback_domain.trim_end_matches('/'), slot.path())
    }
}
