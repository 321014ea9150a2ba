//! Configuration validation.
//!
//! Serde handles syntax; this module checks values against each other and
//! reports every problem found rather than only the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{LayerConfig, ProxyConfig};
use crate::http::server::HEALTH_PATH;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a socket address")]
    BadSocketAddr { field: &'static str, value: String },

    #[error("upstream.base_url: {0}")]
    BadUpstreamUrl(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field}: path '{path}' must start with '/'")]
    RelativePath { field: &'static str, path: String },

    #[error("{field}: path '{path}' must be a literal route (no ':', '*', '{{' or '}}' segments)")]
    InvalidRoutePath { field: &'static str, path: String },

    #[error("{field}: path '{path}' is already in use")]
    DuplicatePath { field: &'static str, path: String },

    #[error("upstream.timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadSocketAddr {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let upstream = &config.upstream;
    match Url::parse(&upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::BadUpstreamUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        ))),
        Err(e) => errors.push(ValidationError::BadUpstreamUrl(e.to_string())),
    }
    for (field, value) in [
        ("upstream.version", &upstream.version),
        ("upstream.output_format", &upstream.output_format),
        ("upstream.srs_name", &upstream.srs_name),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::Empty(field));
        }
    }
    if upstream.timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut taken = vec![HEALTH_PATH.to_string()];
    check_layer(
        ("endpoints.report_area.path", "endpoints.report_area.layer"),
        &config.endpoints.report_area,
        &mut taken,
        &mut errors,
    );
    check_layer(
        (
            "endpoints.breadcrumb_summit.path",
            "endpoints.breadcrumb_summit.layer",
        ),
        &config.endpoints.breadcrumb_summit,
        &mut taken,
        &mut errors,
    );

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadSocketAddr {
            field: "observability.metrics_address",
            value: obs.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_layer(
    (path_field, layer_field): (&'static str, &'static str),
    layer: &LayerConfig,
    taken: &mut Vec<String>,
    errors: &mut Vec<ValidationError>,
) {
    if layer.layer.trim().is_empty() {
        errors.push(ValidationError::Empty(layer_field));
    }

    let path = &layer.path;
    if !path.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field: path_field,
            path: path.clone(),
        });
    } else if !is_literal_route(path) {
        errors.push(ValidationError::InvalidRoutePath {
            field: path_field,
            path: path.clone(),
        });
    } else if taken.contains(path) {
        errors.push(ValidationError::DuplicatePath {
            field: path_field,
            path: path.clone(),
        });
    } else {
        taken.push(path.clone());
    }
}

/// Router syntax (`:name`, `*rest`, `{capture}`) would either be rejected by
/// axum at startup or turn the endpoint into a capture.
fn is_literal_route(path: &str) -> bool {
    path.split('/').all(|segment| {
        !segment.starts_with(':')
            && !segment.starts_with('*')
            && !segment.contains(&['{', '}'][..])
    })
}
