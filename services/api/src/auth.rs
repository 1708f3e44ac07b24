use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;
use vendor_smart::config::{AuthConfig, AuthMode};

const CHALLENGE: &str = "Basic realm=\"vendor-smart\"";

/// Rejects requests whose Basic credentials do not match the configured pair. With no
/// configured pair every request is rejected.
pub(crate) async fn basic_auth_middleware(
    State(mode): State<Arc<AuthMode>>,
    request: Request,
    next: Next,
) -> Response {
    if is_authorized(request.headers(), &mode) {
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "rejected unauthenticated request");
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, CHALLENGE)],
        Json(json!({ "error": "authentication required" })),
    )
        .into_response()
}

fn is_authorized(headers: &HeaderMap, mode: &AuthMode) -> bool {
    match mode {
        AuthMode::Basic(expected) => credentials_match(headers, expected),
        AuthMode::Disabled => true,
        AuthMode::Unconfigured => false,
    }
}

fn credentials_match(headers: &HeaderMap, expected: &AuthConfig) -> bool {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };

    match decoded.split_once(':') {
        Some((username, password)) => {
            username == expected.username && password == expected.password
        }
        None => false,
    }
}

#[cfg(test)]
pub(crate) fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}
