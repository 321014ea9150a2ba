//! Feature Proxy
//!
//! Re-exposes WFS `GetFeature` results from a GeoServer instance as plain
//! JSON endpoints for the browser map client.
//!
//! ```text
//!   Client ──GET /api/reportarea_atco──▶ ┌──────────────┐ ──GetFeature──▶ GeoServer
//!          ──GET /api/breadcrumb_summit─▶ │ feature-proxy│ ◀──GeoJSON────
//!          ◀── GeoJSON | {"error": ..} ── └──────────────┘
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod wfs;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
