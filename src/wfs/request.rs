//! WFS `GetFeature` request construction.
//!
//! URLs are built once at startup from configuration and stay constant for
//! the life of the process.

use std::fmt;

use url::Url;

use crate::config::{LayerConfig, UpstreamConfig};

/// A fully resolved `GetFeature` request for one feature type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetFeatureRequest {
    type_name: String,
    url: Url,
}

impl GetFeatureRequest {
    /// Build the request for `layer` against the configured upstream.
    ///
    /// Query parameters already present on the base URL are kept.
    pub fn new(upstream: &UpstreamConfig, layer: &LayerConfig) -> Result<Self, url::ParseError> {
        let type_name = qualified_type_name(&upstream.workspace, &layer.layer);

        let mut url = Url::parse(&upstream.base_url)?;
        url.query_pairs_mut()
            .append_pair("service", "WFS")
            .append_pair("version", &upstream.version)
            .append_pair("request", "GetFeature")
            .append_pair("typeName", &type_name)
            .append_pair("outputFormat", &upstream.output_format)
            .append_pair("srsName", &upstream.srs_name);

        Ok(Self { type_name, url })
    }

    /// Feature type name as sent upstream (`workspace:layer`).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for GetFeatureRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

fn qualified_type_name(workspace: &str, layer: &str) -> String {
    if workspace.is_empty() || layer.contains(':') {
        layer.to_string()
    } else {
        format!("{workspace}:{layer}")
    }
}
