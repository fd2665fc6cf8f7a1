//! Builder for configuring gateway instances

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use super::recache::RecachePipeline;
use super::{Gateway, GatewayConfig};
use crate::cache::{CacheConfig, ResponseCache};
use crate::catalog::{FlickrCatalog, PhotoCatalog};
use crate::types::MissingSlotPolicy;
use crate::{PhotoreelError, Result};

/// Default timeout for catalog and image fetches.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main entry point for creating gateway instances.
pub struct Photoreel;

impl Photoreel {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> PhotoreelBuilder {
        PhotoreelBuilder::new()
    }
}

struct FlickrSettings {
    api_key: String,
    photoset_id: String,
    base_url: Option<String>,
}

/// Builder for configuring gateway instances.
pub struct PhotoreelBuilder {
    catalog: Option<Arc<dyn PhotoCatalog>>,
    flickr: Option<FlickrSettings>,
    image_count: u32,
    fallback_domain: Option<String>,
    manifest_path: Option<String>,
    refresh_path: Option<String>,
    missing_slot_policy: MissingSlotPolicy,
    cache: CacheConfig,
    timeout_secs: Option<u64>,
    http_client: Option<reqwest::Client>,
}

impl PhotoreelBuilder {
    pub fn new() -> Self {
        Self {
            catalog: None,
            flickr: None,
            image_count: super::config::DEFAULT_IMAGE_COUNT.get(),
            fallback_domain: None,
            manifest_path: None,
            refresh_path: None,
            missing_slot_policy: MissingSlotPolicy::default(),
            cache: CacheConfig::default(),
            timeout_secs: None,
            http_client: None,
        }
    }

    /// Use a custom photo catalog. Takes precedence over [`flickr`](Self::flickr).
    pub fn catalog(mut self, catalog: Arc<dyn PhotoCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Source photos from a Flickr photoset.
    pub fn flickr(mut self, api_key: impl Into<String>, photoset_id: impl Into<String>) -> Self {
        self.flickr = Some(FlickrSettings {
            api_key: api_key.into(),
            photoset_id: photoset_id.into(),
            base_url: None,
        });
        self
    }

    /// Override the Flickr API host (for testing with wiremock).
    ///
    /// Has no effect unless [`flickr`](Self::flickr) was called first.
    pub fn flickr_base_url(mut self, url: impl Into<String>) -> Self {
        if let Some(flickr) = self.flickr.as_mut() {
            flickr.base_url = Some(url.into());
        }
        self
    }

    /// Number of rotation slots `N` (default: 6).
    pub fn image_count(mut self, n: u32) -> Self {
        self.image_count = n;
        self
    }

    /// Redirect target for unmatched paths. Required.
    pub fn fallback_domain(mut self, url: impl Into<String>) -> Self {
        self.fallback_domain = Some(url.into());
        self
    }

    /// Manifest route (default: `/photos.json`).
    pub fn manifest_path(mut self, path: impl Into<String>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Manual refresh route (default: `/update-cache`).
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = Some(path.into());
        self
    }

    /// What to answer for a slot that is still missing after a recache.
    ///
    /// - [`MissingSlotPolicy::NotFound`]: 404
    /// - [`MissingSlotPolicy::RedirectToSource`]: 302 to the photo's source URL
    /// - [`MissingSlotPolicy::RedirectToFallback`]: 302 to `{fallback}/{n}.jpg` (default)
    pub fn missing_slot_policy(mut self, policy: MissingSlotPolicy) -> Self {
        self.missing_slot_policy = policy;
        self
    }

    /// Set the response cache configuration.
    ///
    /// Capacity is always resized to fit the configured slots plus the manifest.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Set the cache TTL (also advertised as `Cache-Control: max-age`).
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.cache = self.cache.ttl(ttl);
        self
    }

    /// Set the timeout for catalog and image fetches (seconds).
    ///
    /// Ignored when a custom client is supplied via [`http_client`](Self::http_client).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Share an existing HTTP client for catalog and image fetches.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the gateway.
    pub fn build(self) -> Result<Gateway> {
        let image_count = NonZeroU32::new(self.image_count).ok_or_else(|| {
            PhotoreelError::Configuration("image count must be at least 1".into())
        })?;
        let fallback_domain = self.fallback_domain.ok_or_else(|| {
            PhotoreelError::Configuration("no fallback domain configured".into())
        })?;

        let mut config = GatewayConfig::new(fallback_domain);
        config.image_count = image_count;
        config.missing_slot_policy = self.missing_slot_policy;
        config.cache = self.cache.slots(image_count.get());
        if let Some(path) = self.manifest_path {
            config.manifest_path = path;
        }
        if let Some(path) = self.refresh_path {
            config.refresh_path = path;
        }
        config.validate()?;

        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(Duration::from_secs(
                    self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
                ))
                .build()
                .map_err(|e| {
                    PhotoreelError::Configuration(format!("failed to build HTTP client: {e}"))
                })?,
        };

        let catalog: Arc<dyn PhotoCatalog> = match (self.catalog, self.flickr) {
            (Some(catalog), _) => catalog,
            (None, Some(flickr)) => {
                let mut client = FlickrCatalog::new(http.clone(), flickr.api_key, flickr.photoset_id);
                if let Some(url) = flickr.base_url {
                    client = client.base_url(url);
                }
                Arc::new(client)
            }
            (None, None) => {
                return Err(PhotoreelError::Configuration(
                    "no photo catalog configured".into(),
                ));
            }
        };

        let cache = Arc::new(ResponseCache::new(&config.cache));
        let pipeline = RecachePipeline::new(&config, catalog, cache.clone(), http);
        Ok(Gateway::new(config, cache, pipeline))
    }
}

impl Default for PhotoreelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
