//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file reproduces the stock endpoints.

use serde::{Deserialize, Serialize};

/// Root configuration for the feature proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream WFS server settings shared by every endpoint.
    pub upstream: UpstreamConfig,

    /// The two proxied feature endpoints.
    pub endpoints: EndpointsConfig,

    /// Local HTTP API behaviour.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Upstream WFS server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// OWS endpoint of the feature server, without WFS query parameters.
    pub base_url: String,

    /// Workspace prefix for layer names (`workspace:layer`). Empty means
    /// layer names are sent unqualified.
    pub workspace: String,

    /// WFS protocol version.
    pub version: String,

    /// Requested output format.
    pub output_format: String,

    /// Requested coordinate reference system.
    pub srs_name: String,

    /// Total timeout for one upstream request. `None` relies on the HTTP
    /// client's defaults.
    pub timeout_secs: Option<u64>,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/geoserver/pcubedgis/ows".to_string(),
            workspace: "pcubedgis".to_string(),
            version: "1.0.0".to_string(),
            output_format: "application/json".to_string(),
            srs_name: "EPSG:4326".to_string(),
            timeout_secs: None,
            system_proxy: false,
        }
    }
}

/// Endpoint definitions, one per proxied layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub report_area: LayerConfig,
    pub breadcrumb_summit: LayerConfig,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            report_area: LayerConfig::new("/api/reportarea_atco", "reportarea_atco"),
            breadcrumb_summit: LayerConfig::new("/api/breadcrumb_summit", "breadcrumbsummit"),
        }
    }
}

/// A local route bound to one upstream feature type.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LayerConfig {
    /// Local route path (e.g., "/api/reportarea_atco").
    pub path: String,

    /// Upstream feature type name, without workspace prefix.
    pub layer: String,
}

impl LayerConfig {
    pub fn new(path: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            layer: layer.into(),
        }
    }
}

/// Local HTTP API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Allow any origin to call the API (the map client runs elsewhere).
    pub cors_permissive: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_permissive: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
