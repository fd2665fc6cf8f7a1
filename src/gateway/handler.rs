//! Cache-aside request handling.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::cache::{CacheKey, CachedResponse, ResponseCache};
use crate::telemetry;
use crate::types::{MissingSlotPolicy, Slot};

use super::recache::{RecachePipeline, RecacheReport};
use super::{GatewayConfig, Reply, Route};

/// The cache-aside gateway.
///
/// Cheap to share behind an `Arc`; every request runs as its own task and
/// only the [`ResponseCache`] is shared between them.
pub struct Gateway {
    config: GatewayConfig,
    cache: Arc<ResponseCache>,
    pipeline: RecachePipeline,
}

impl Gateway {
    pub(crate) fn new(
        config: GatewayConfig,
        cache: Arc<ResponseCache>,
        pipeline: RecachePipeline,
    ) -> Self {
        Self {
            config,
            cache,
            pipeline,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Answer one request.
    ///
    /// `path` is the request path; anything after `?` or `#` is ignored.
    pub async fn handle(&self, method: &str, path: &str) -> Reply {
        let key = CacheKey::new(method, path);
        let route = Route::classify(key.path(), &self.config);
        metrics::counter!(telemetry::REQUESTS_TOTAL, "route" => route.label()).increment(1);

        match route {
            Route::Image(slot) => self.serve_slot(slot).await,
            Route::Manifest => self.serve_manifest().await,
            Route::Refresh => {
                let report = self.refresh().await;
                Reply::Json(acknowledgement(&report))
            }
            Route::InvalidSlot => {
                debug!(path = key.path(), max = self.config.image_count.get(), "slot out of range");
                Reply::NotFound
            }
            Route::Unmatched => {
                debug!(path = key.path(), to = %self.config.fallback_domain, "no matching route, redirecting");
                Reply::Redirect(self.config.fallback_domain.clone())
            }
        }
    }

    /// Force a full recache regardless of what is cached.
    pub async fn refresh(&self) -> RecacheReport {
        self.pipeline.run().await
    }

    async fn serve_slot(&self, slot: Slot) -> Reply {
        let key = CacheKey::get(&slot.path());
        if let Some(hit) = self.lookup(&key, "image").await {
            debug!(%slot, "cache hit");
            return Reply::Response(hit);
        }

        let report = self.pipeline.run().await;
        if let Some(fresh) = self.cache.get(&key).await {
            return Reply::Response(fresh);
        }
        self.missing_slot(slot, &report)
    }

    async fn serve_manifest(&self) -> Reply {
        let key = CacheKey::get(&self.config.manifest_path);
        if let Some(hit) = self.lookup(&key, "manifest").await {
            debug!("manifest cache hit");
            return Reply::Response(hit);
        }

        self.pipeline.run().await;
        if let Some(fresh) = self.cache.get(&key).await {
            return Reply::Response(fresh);
        }
        debug!("no photos available, serving empty manifest");
        Reply::Response(
            CachedResponse::ok("application/json", "[]")
                .with_header("cache-control", self.cache.cache_control()),
        )
    }

    async fn lookup(&self, key: &CacheKey, route: &'static str) -> Option<CachedResponse> {
        let found = self.cache.get(key).await;
        let metric = if found.is_some() {
            telemetry::CACHE_HITS_TOTAL
        } else {
            telemetry::CACHE_MISSES_TOTAL
        };
        metrics::counter!(metric, "route" => route).increment(1);
        found
    }

    fn missing_slot(&self, slot: Slot, report: &RecacheReport) -> Reply {
        let reply = match self.config.missing_slot_policy {
            MissingSlotPolicy::NotFound => Reply::NotFound,
            MissingSlotPolicy::RedirectToSource => report
                .source_for(slot)
                .map(|url| Reply::Redirect(url.to_string()))
                .unwrap_or_else(|| Reply::Redirect(self.config.fallback_for(slot))),
            MissingSlotPolicy::RedirectToFallback => {
                Reply::Redirect(self.config.fallback_for(slot))
            }
        };
        debug!(%slot, policy = ?self.config.missing_slot_policy, status = reply.status(), "slot still missing after recache");
        reply
    }
}

/// JSON body returned by the refresh route.
fn acknowledgement(report: &RecacheReport) -> serde_json::Value {
    json!({
        "status": "ok",
        "outcome": report.outcome,
        "selected": report.selected(),
        "cached": report.cached(),
        "failed": report.failed(),
    })
}
