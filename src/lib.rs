//! Photoreel - cache-aside edge gateway for a rotating set of catalog photos
//!
//! Serves `N` numbered images (`/1.jpg` … `/{N}.jpg`) and a JSON manifest
//! picked at random from a Flickr photoset. Responses are cached for a
//! fixed TTL so the catalog is only queried when the rotation expires or
//! a refresh is forced.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = photoreel::Photoreel::builder()
//!         .flickr("your-api-key", "72157600000000000")
//!         .fallback_domain("https://example.com")
//!         .image_count(6)
//!         .build()?;
//!
//!     let app = photoreel::server::router(Arc::new(gateway));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8787").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! The gateway can also be driven directly, without HTTP:
//!
//! ```rust,no_run
//! # async fn demo(gateway: photoreel::Gateway) {
//! let reply = gateway.handle("GET", "/3.jpg").await;
//! println!("{}", reply.status());
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod error;
pub mod gateway;
pub mod selector;
pub mod server;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheKey, CachedResponse, ResponseCache};
pub use catalog::{FlickrCatalog, PhotoCatalog};
pub use error::{PhotoreelError, Result};
pub use gateway::{
    Gateway, GatewayConfig, Photoreel, PhotoreelBuilder, RecacheOutcome, RecachePipeline,
    RecacheReport, Reply, Route,
};
pub use selector::select_random;
pub use types::{MissingSlotPolicy, PhotoRecord, Slot};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
