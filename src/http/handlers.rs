//! API handlers.
//!
//! The two feature endpoints are identical apart from the layer they fetch.
//! Each one is independent: a failing layer never affects the other.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::response::error_chain;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::wfs::GetFeatureRequest;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Liveness probe; does not touch the upstream.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/reportarea_atco`
pub async fn report_area_features(State(state): State<AppState>) -> Response {
    serve_layer(&state, &state.report_area).await
}

/// `GET /api/breadcrumb_summit`
pub async fn breadcrumb_summit_features(State(state): State<AppState>) -> Response {
    serve_layer(&state, &state.breadcrumb_summit).await
}

async fn serve_layer(state: &AppState, request: &GetFeatureRequest) -> Response {
    let layer = request.type_name();

    match state.client.fetch(request).await {
        Ok(collection) => {
            let features = collection.feature_count();
            tracing::info!(layer = %layer, features, "Feature data loaded");
            metrics::record_feature_count(layer, features);
            metrics::record_request(layer, 200, "ok");
            Json(collection).into_response()
        }
        Err(e) => {
            tracing::error!(layer = %layer, error = %error_chain(&e), "Error loading feature data");
            metrics::record_request(layer, 500, e.kind());
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    use axum::{http::StatusCode, routing::get, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;
    use tracing::instrument::WithSubscriber;
    use tracing_subscriber::fmt::MakeWriter;

    use crate::config::ProxyConfig;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn state_for(base_url: String) -> AppState {
        let mut config = ProxyConfig::default();
        config.upstream.base_url = base_url;
        AppState::from_config(&config).unwrap()
    }

    async fn upstream_serving(body: Value) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route(
            "/ows",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}/ows")
    }

    /// Run the report area handler with a capturing subscriber.
    async fn run_logged(state: AppState) -> (StatusCode, String) {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let response = report_area_features(State(state))
            .with_subscriber(subscriber)
            .await;
        (response.status(), logs.contents())
    }

    #[tokio::test]
    async fn logs_feature_count_of_loaded_layer() {
        let base_url = upstream_serving(json!({
            "type": "FeatureCollection",
            "features": [{"id": 1}, {"id": 2}, {"id": 3}],
        }))
        .await;

        let (status, logs) = run_logged(state_for(base_url)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(logs.contains("Feature data loaded"), "{logs}");
        assert!(logs.contains("layer=pcubedgis:reportarea_atco"), "{logs}");
        assert!(logs.contains("features=3"), "{logs}");
    }

    #[tokio::test]
    async fn logs_zero_when_features_are_absent() {
        let base_url = upstream_serving(json!({"type": "FeatureCollection"})).await;

        let (status, logs) = run_logged(state_for(base_url)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(logs.contains("features=0"), "{logs}");
    }

    #[tokio::test]
    async fn logs_upstream_failure_at_error_level() {
        let dead = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let (status, logs) = run_logged(state_for(format!("http://{dead}/ows"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("Error loading feature data"), "{logs}");
        assert!(!logs.contains("Feature data loaded"), "{logs}");
    }
}
