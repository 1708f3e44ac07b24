use crate::auth::basic_auth_middleware;
use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use vendor_smart::catalog::ReferenceCatalog;
use vendor_smart::config::AuthMode;
use vendor_smart::registry::{registry_router, Registry};

/// Registry routes, guarded by Basic auth unless auth was explicitly disabled, plus the
/// open operational endpoints.
pub(crate) fn with_registry_routes<C>(registry: Arc<Registry<C>>, auth: AuthMode) -> Router
where
    C: ReferenceCatalog + 'static,
{
    let mut api = registry_router(registry);
    if !matches!(auth, AuthMode::Disabled) {
        api = api.layer(middleware::from_fn_with_state(
            Arc::new(auth),
            basic_auth_middleware,
        ));
    }

    api.route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
