//! Request classification.
//!
//! Classification looks at the path only. The method matters for cache
//! identity, not for which route a request takes.

use crate::types::Slot;

use super::GatewayConfig;

/// The route a request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/{n}.jpg` with `n` in `[1, N]`.
    Image(Slot),
    /// `/{digits}.jpg` outside `[1, N]`, including values too large to parse.
    InvalidSlot,
    /// The manifest path.
    Manifest,
    /// The manual refresh trigger.
    Refresh,
    /// Anything else.
    Unmatched,
}

impl Route {
    /// Classify a request path (query string already stripped).
    pub fn classify(path: &str, config: &GatewayConfig) -> Self {
        if path == config.manifest_path {
            return Route::Manifest;
        }
        if path == config.refresh_path {
            return Route::Refresh;
        }
        match slot_digits(path) {
            Some(digits) => digits
                .parse::<u32>()
                .ok()
                .and_then(|n| Slot::new(n, config.image_count))
                .map_or(Route::InvalidSlot, Route::Image),
            None => Route::Unmatched,
        }
    }

    /// Metric label for this route.
    pub fn label(&self) -> &'static str {
        match self {
            Route::Image(_) => "image",
            Route::InvalidSlot => "invalid_slot",
            Route::Manifest => "manifest",
            Route::Refresh => "refresh",
            Route::Unmatched => "unmatched",
        }
    }
}

/// Extract `digits` from `/{digits}.jpg`.
fn slot_digits(path: &str) -> Option<&str> {
    let digits = path.strip_prefix('/')?.strip_suffix(".jpg")?;
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}
