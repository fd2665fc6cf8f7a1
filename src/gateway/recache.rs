//! Recache pipeline: catalog → selection → per-slot fetch → cache.
//!
//! One run refreshes the whole rotation. All slots are rebuilt together so
//! every slot comes from the same selection; refreshing a single slot would
//! mix photos from different rotations.
//!
//! # Failure semantics
//!
//! - An empty catalog result aborts the run before anything is written, so
//!   the previous rotation keeps being served until its TTL expires.
//! - Each slot is fetched and stored independently. A failed fetch leaves
//!   that slot without a fresh entry and does not affect the others.
//! - Failure responses are never cached.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use reqwest::Client;
use reqwest::header::REFERER;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, CachedResponse, ResponseCache};
use crate::catalog::PhotoCatalog;
use crate::selector::select_random;
use crate::telemetry;
use crate::types::{PhotoRecord, Slot};
use crate::{PhotoreelError, Result};

use super::GatewayConfig;

/// Upstream headers that describe the upstream connection or freshness
/// rather than the image, and are not replayed from cache.
const SKIPPED_HEADERS: &[&str] = &[
    "age",
    "cache-control",
    "connection",
    "content-length",
    "expires",
    "keep-alive",
    "proxy-authenticate",
    "proxy-connection",
    "set-cookie",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// How a recache run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecacheOutcome {
    /// The catalog returned no eligible photos; nothing was written.
    CatalogEmpty,
    /// Every selected photo was fetched and cached.
    Complete,
    /// Some slots failed or the catalog had fewer photos than slots.
    Partial,
}

impl RecacheOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecacheOutcome::CatalogEmpty => "catalog_empty",
            RecacheOutcome::Complete => "complete",
            RecacheOutcome::Partial => "partial",
        }
    }
}

/// Result of one slot in a recache run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotReport {
    pub slot: Slot,
    /// Source URL of the photo assigned to this slot.
    pub source_url: String,
    /// Whether a fresh entry was stored.
    pub cached: bool,
}

/// Summary of one recache run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecacheReport {
    pub outcome: RecacheOutcome,
    /// One entry per selected photo, in slot order.
    pub slots: Vec<SlotReport>,
}

impl RecacheReport {
    fn catalog_empty() -> Self {
        Self {
            outcome: RecacheOutcome::CatalogEmpty,
            slots: Vec::new(),
        }
    }

    /// Source URL assigned to `slot` in this run, if any.
    pub fn source_for(&self, slot: Slot) -> Option<&str> {
        self.slots
            .iter()
            .find(|r| r.slot == slot)
            .map(|r| r.source_url.as_str())
    }

    /// Number of photos selected for the rotation.
    pub fn selected(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots that received a fresh entry.
    pub fn cached(&self) -> usize {
        self.slots.iter().filter(|r| r.cached).count()
    }

    /// Number of selected slots whose fetch failed.
    pub fn failed(&self) -> usize {
        self.selected() - self.cached()
    }
}

/// Rebuilds the cached rotation from the catalog.
pub struct RecachePipeline {
    catalog: Arc<dyn PhotoCatalog>,
    cache: Arc<ResponseCache>,
    http: Client,
    image_count: NonZeroU32,
    manifest_key: CacheKey,
    referer: String,
}

impl RecachePipeline {
    pub fn new(
        config: &GatewayConfig,
        catalog: Arc<dyn PhotoCatalog>,
        cache: Arc<ResponseCache>,
        http: Client,
    ) -> Self {
        Self {
            catalog,
            cache,
            http,
            image_count: config.image_count,
            manifest_key: CacheKey::get(&config.manifest_path),
            referer: config.fallback_domain.clone(),
        }
    }

    /// Run the full pipeline once.
    ///
    /// Never fails; problems are logged and reflected in the report.
    pub async fn run(&self) -> RecacheReport {
        let started = Instant::now();
        let report = self.run_inner().await;

        metrics::histogram!(telemetry::RECACHE_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        metrics::counter!(telemetry::RECACHE_TOTAL, "outcome" => report.outcome.as_str())
            .increment(1);

        info!(
            catalog = self.catalog.name(),
            outcome = report.outcome.as_str(),
            selected = report.selected(),
            cached = report.cached(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "recache finished"
        );
        report
    }

    async fn run_inner(&self) -> RecacheReport {
        let eligible: Vec<PhotoRecord> = self
            .catalog
            .fetch_photos()
            .await
            .into_iter()
            .filter(PhotoRecord::is_eligible)
            .collect();
        metrics::gauge!(telemetry::CATALOG_PHOTOS).set(eligible.len() as f64);

        if eligible.is_empty() {
            warn!(
                catalog = self.catalog.name(),
                "catalog returned no eligible photos, keeping current rotation"
            );
            return RecacheReport::catalog_empty();
        }

        let selected = self.choose_rotation(eligible);

        let fetches = selected
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                Slot::from_index(index, self.image_count).map(|slot| self.refresh_slot(slot, record))
            });
        let slots = join_all(fetches).await;

        self.store_manifest(&selected).await;

        let outcome = if slots.iter().all(|r| r.cached)
            && slots.len() == self.image_count.get() as usize
        {
            RecacheOutcome::Complete
        } else {
            RecacheOutcome::Partial
        };
        RecacheReport { outcome, slots }
    }

    fn choose_rotation(&self, eligible: Vec<PhotoRecord>) -> Vec<PhotoRecord> {
        let mut rng = rand::rng();
        select_random(eligible, self.image_count.get() as usize, &mut rng)
    }

    async fn refresh_slot(&self, slot: Slot, record: &PhotoRecord) -> SlotReport {
        let cached = match self.fetch_image(&record.url).await {
            Ok(response) => {
                self.cache.insert(CacheKey::get(&slot.path()), response).await;
                metrics::counter!(telemetry::SLOT_FETCH_TOTAL, "status" => "ok").increment(1);
                debug!(%slot, url = %record.url, "cached slot image");
                true
            }
            Err(e) => {
                metrics::counter!(telemetry::SLOT_FETCH_TOTAL, "status" => "error").increment(1);
                warn!(%slot, url = %record.url, error = %e, "image fetch failed, slot left uncached");
                false
            }
        };
        SlotReport {
            slot,
            source_url: record.url.clone(),
            cached,
        }
    }

    /// Fetch an image and turn it into a cacheable response.
    async fn fetch_image(&self, url: &str) -> Result<CachedResponse> {
        let response = self
            .http
            .get(url)
            .header(REFERER, &self.referer)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PhotoreelError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let headers = response
            .headers()
            .iter()
            .filter(|(name, _)| !SKIPPED_HEADERS.contains(&name.as_str()))
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        Ok(CachedResponse {
            status: status.as_u16(),
            headers,
            body,
        }
        .with_header("cache-control", self.cache.cache_control()))
    }

    async fn store_manifest(&self, selected: &[PhotoRecord]) {
        match serde_json::to_vec(selected) {
            Ok(body) => {
                let response = CachedResponse::ok("application/json", body)
                    .with_header("cache-control", self.cache.cache_control());
                self.cache.insert(self.manifest_key.clone(), response).await;
            }
            Err(e) => warn!(error = %e, "failed to serialize manifest"),
        }
    }
}
