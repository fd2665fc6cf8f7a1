//! Photo catalog clients.
//!
//! The gateway only needs one thing from a catalog: the current list of
//! candidate photos. [`PhotoCatalog`] is that seam. Implementations must
//! never surface an error to the caller. Transport failures, malformed
//! payloads, and provider-reported errors all degrade to an empty list,
//! which the recache pipeline treats as "leave the cache alone".

mod flickr;

use async_trait::async_trait;

use crate::types::PhotoRecord;

pub use flickr::{DEFAULT_FLICKR_BASE_URL, FlickrCatalog};

/// Source of candidate photos for a rotation.
#[async_trait]
pub trait PhotoCatalog: Send + Sync {
    /// Catalog name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch the current candidate photos, in catalog order.
    ///
    /// Returns an empty vec on any failure.
    async fn fetch_photos(&self) -> Vec<PhotoRecord>;
}
