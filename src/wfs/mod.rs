//! WFS upstream subsystem.
//!
//! # Data Flow
//! ```text
//! UpstreamConfig + LayerConfig
//!     → request.rs (GetFeature URL, built once at startup)
//!     → client.rs (GET, status check, JSON decode)
//!     → types.rs (FeatureCollection | FetchError)
//! ```
//!
//! # Design Decisions
//! - The GeoJSON body is opaque; only the `features` length is read
//! - Transport, status and decode failures share one error type
//! - No retries, no caching

pub mod client;
pub mod request;
pub mod types;

pub use client::FeatureClient;
pub use request::GetFeatureRequest;
pub use types::{FeatureCollection, FetchError};
