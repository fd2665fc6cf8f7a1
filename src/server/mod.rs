//! HTTP server surface.
//!
//! This module provides:
//! - The axum adapter that exposes a [`Gateway`](crate::Gateway) over HTTP (`service`)
//! - Configuration types for the daemon (`config`, server-only)

#[cfg(feature = "server")]
pub mod config;
pub mod service;

pub use service::router;
