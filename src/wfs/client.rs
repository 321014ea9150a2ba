//! Upstream feature server client.
//!
//! # Responsibilities
//! - Issue one GET per call; no retries
//! - Classify failures into `FetchError`
//! - Decode the body as JSON without reshaping it

use std::time::{Duration, Instant};

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::wfs::request::GetFeatureRequest;
use crate::wfs::types::{FeatureCollection, FetchError};

/// Shared HTTP client for the feature server. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FeatureClient {
    http: reqwest::Client,
}

impl FeatureClient {
    /// Create a client with the configured timeout and proxy policy.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("feature-proxy/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            http: builder.build()?,
        })
    }

    /// Fetch the feature collection described by `request`.
    pub async fn fetch(&self, request: &GetFeatureRequest) -> Result<FeatureCollection, FetchError> {
        let start = Instant::now();
        let result = self.fetch_inner(request).await;
        metrics::record_upstream(request.type_name(), start);
        result
    }

    async fn fetch_inner(&self, request: &GetFeatureRequest) -> Result<FeatureCollection, FetchError> {
        let url = request.url().to_string();
        tracing::debug!(type_name = %request.type_name(), url = %url, "Fetching features");

        let response = self
            .http
            .get(request.url().clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
    }
}
