use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Browser forms may call the public profile routes from any origin.
pub fn public_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .allow_origin(Any)
}
