//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned)
//!     → handlers.rs (fetch layer via wfs::FeatureClient)
//!     → response.rs (upstream failure → 500 JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ErrorBody;
pub use server::{AppState, HttpServer, ServerError};
