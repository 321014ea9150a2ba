//! Upstream payload and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A GeoJSON document returned by the feature server.
///
/// The document is kept opaque and re-serialized as received; only the
/// top-level `features` array is ever inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureCollection(Value);

impl FeatureCollection {
    /// Length of the top-level `features` array, 0 when there is none.
    pub fn feature_count(&self) -> usize {
        self.0
            .get("features")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for FeatureCollection {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Failure to obtain a feature collection from the upstream server.
///
/// Every variant is surfaced to API callers the same way (HTTP 500); the
/// variants only differ in the message they carry.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (connect, DNS, timeout).
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The upstream body is not a JSON document.
    #[error("upstream body from {url} is not valid JSON")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "transport",
            FetchError::Status { .. } => "status",
            FetchError::Decode { .. } => "decode",
        }
    }
}
