//! JSON error bodies.
//!
//! Upstream failures never escape a handler: they become a 500 with
//! `{"error": "<message>"}` where the message is the error followed by its
//! source chain.

use std::error::Error;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::wfs::FetchError;

/// Body returned on any upstream failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        Self {
            error: error_chain(err),
        }
    }
}

/// `err` and every `source()` below it, joined by ": ".
pub fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::from_error(&self))).into_response()
    }
}
