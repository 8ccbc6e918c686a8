use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{AuthError, Identity};
use crate::error::ApiError;
use crate::state::AppState;

/// Session context resolved from the `session` cookie
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub session_id: Uuid,
    pub identity: Identity,
}

/// Resolves the session cookie and injects a [`SessionUser`] into the request.
///
/// Never rejects: requests without a valid session simply carry no identity.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.auth.resolve(request.headers()).await {
        Ok((session_id, identity)) => {
            request
                .extensions_mut()
                .insert(SessionUser { session_id, identity });
        }
        Err(AuthError::MissingSession) => {}
        Err(e) => tracing::debug!("Ignoring session cookie: {}", e),
    }

    next.run(request).await
}

/// Rejects requests that reached it without a session identity.
pub async fn require_session(request: Request, next: Next) -> Result<Response, ApiError> {
    if request.extensions().get::<SessionUser>().is_none() {
        return Err(ApiError::not_authenticated());
    }

    Ok(next.run(request).await)
}

/// Handler-side view of the gate: the caller's session, or `None`.
#[derive(Clone, Debug)]
pub struct CurrentSession(pub Option<SessionUser>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentSession(parts.extensions.get::<SessionUser>().cloned()))
    }
}
