// handlers/public/oauth.rs - social login and logout
//
// GET /auth/:provider            -> 302 to the provider's consent page
// GET /auth/:provider/callback   -> 302 to {FRONTEND_URL}/dashboard with a session cookie,
//                                   or 302 to /?error=<provider>_failed
// GET /logout                    -> 200 {"message": "Logged out"}, always

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::auth::{CallbackParams, Provider};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, CurrentSession};
use crate::state::AppState;

/// GET /auth/:provider - begin the OAuth handshake
pub async fn login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Response, ApiError> {
    let provider: Provider = provider.parse()?;

    match state.auth.begin_login(provider).await {
        Ok(url) => Ok(found(&url)),
        Err(e) => {
            tracing::warn!("Cannot start {} login: {}", provider, e);
            Ok(failed(provider))
        }
    }
}

/// GET /auth/:provider/callback - finish the handshake and bind the identity to a session
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ApiError> {
    let provider: Provider = provider.parse()?;

    match state.auth.complete_login(provider, params).await {
        Ok(outcome) => {
            let dashboard = format!("{}/dashboard", state.config.security.frontend_url);
            Ok((
                StatusCode::FOUND,
                [
                    (header::LOCATION, dashboard),
                    (header::SET_COOKIE, outcome.set_cookie),
                ],
            )
                .into_response())
        }
        Err(e) => {
            tracing::warn!("{} login failed: {}", provider, e);
            Ok(failed(provider))
        }
    }
}

/// GET /logout - drop the session (if any) and clear the cookie
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> impl IntoResponse {
    let cleared = state.auth.logout(session.map(|s| s.session_id)).await;

    (
        [(header::SET_COOKIE, cleared)],
        ApiResponse::success(json!({ "message": "Logged out" })),
    )
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

fn failed(provider: Provider) -> Response {
    found(&format!("/?error={}", provider.failure_code()))
}
