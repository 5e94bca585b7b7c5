//! CORS layer for the viewer UI.
//!
//! Wrapper around tower-http CORS. Any origin may read the API; only the
//! methods and headers the viewer uses are allowed.

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Create the CORS layer attached unless CORS is disabled.
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::ORIGIN])
        .expose_headers([header::DATE])
}
