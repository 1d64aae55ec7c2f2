//! API-key header gate.
//!
//! The upstream deployment this service replaces shipped with its 401 path
//! disabled: mismatched keys were logged and let through. That behavior is
//! kept as the explicit default here via the `API_KEY_ENFORCE` toggle.
//! Set it to `true` to actually reject mismatches.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::state::AppState;

pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let server = &state.config.server;

    let Some(expected) = server.api_key.as_deref() else {
        // No key configured: the gate is off.
        return next.run(request).await;
    };

    let presented = request
        .headers()
        .get(server.api_key_header.as_str())
        .and_then(|v| v.to_str().ok());

    if presented != Some(expected) {
        tracing::warn!(
            header = %server.api_key_header,
            present = presented.is_some(),
            enforced = server.enforce_api_key,
            "Invalid or missing API key"
        );
        if server.enforce_api_key {
            let body = Json(json!({
                "detail": "Invalid or missing API Key",
                "code": StatusCode::UNAUTHORIZED.as_u16()
            }));
            return (StatusCode::UNAUTHORIZED, body).into_response();
        }
    }

    next.run(request).await
}
