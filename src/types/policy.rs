//! Fallback policy for slots that stay uncached after a recache.

use serde::{Deserialize, Serialize};

/// What the gateway answers when a slot is still missing after a recache.
///
/// A slot ends up missing when the catalog returned fewer eligible photos
/// than there are slots, or when the image fetch for that slot failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingSlotPolicy {
    /// Reply `404 Not Found`.
    NotFound,

    /// Redirect (302) to the photo's original source URL.
    ///
    /// Falls back to [`RedirectToFallback`](Self::RedirectToFallback) when
    /// the last rotation assigned no photo to the slot.
    RedirectToSource,

    /// Redirect (302) to `{fallback_domain}/{slot}.jpg`.
    ///
    /// This is the default.
    #[default]
    RedirectToFallback,
}
