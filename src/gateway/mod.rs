//! Gateway implementations

mod builder;
mod config;
mod handler;
pub mod recache;
mod reply;
pub mod routing;

pub use builder::{Photoreel, PhotoreelBuilder};
pub use config::{DEFAULT_IMAGE_COUNT, DEFAULT_MANIFEST_PATH, DEFAULT_REFRESH_PATH, GatewayConfig};
pub use handler::Gateway;
pub use recache::{RecacheOutcome, RecachePipeline, RecacheReport, SlotReport};
pub use reply::Reply;
pub use routing::Route;
