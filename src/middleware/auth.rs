use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use subtle::ConstantTimeEq;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Shared secret for administrative routes. `None` closes them entirely.
#[derive(Clone, Debug, Default)]
pub struct AdminKey(Option<Arc<str>>);

impl AdminKey {
    pub fn new(key: Option<String>) -> Self {
        Self(key.map(Arc::from))
    }

    fn verify(&self, provided: &str) -> bool {
        match &self.0 {
            Some(expected) => ConstantTimeEq::ct_eq(provided.as_bytes(), expected.as_bytes()).into(),
            None => false,
        }
    }
}

pub async fn require_admin_key(State(admin): State<AdminKey>, req: Request, next: Next) -> Response {
    if admin.0.is_none() {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"success": false, "error": "admin_access_disabled"})),
        )
            .into_response();
    }

    let Some(header) = req.headers().get(ADMIN_KEY_HEADER) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "missing_admin_key"})),
        )
            .into_response();
    };
    let Ok(provided) = header.to_str() else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "bad_admin_key"})),
        )
            .into_response();
    };

    if !admin.verify(provided) {
        tracing::warn!("rejected administrative request with an invalid key");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "invalid_admin_key"})),
        )
            .into_response();
    }

    next.run(req).await
}
