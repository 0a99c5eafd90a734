pub mod health;
pub mod profile;
pub mod stats;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    middleware::{auth, cors::public_cors, rate_limit},
    AppState,
};

const MAX_BODY_BYTES: usize = 16 * 1024;

pub fn router(state: AppState, config: &Config) -> Router {
    let public_api = Router::new()
        .route("/api/profiles", post(profile::create_profile))
        .route("/api/profiles/search", post(profile::search_profiles))
        .route("/api/stats", get(stats::get_stats))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::per_second(config.public_rps),
            rate_limit::enforce_budget,
        ))
        .layer(public_cors());

    let admin_api = Router::new()
        .route("/api/admin/profiles", get(profile::list_profiles))
        .layer(axum::middleware::from_fn_with_state(
            auth::AdminKey::new(config.admin_api_key.clone()),
            auth::require_admin_key,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(public_api)
        .merge(admin_api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
