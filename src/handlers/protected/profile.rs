// handlers/protected/profile.rs - GET /profile
//
// Reached only through `require_session`, so the SessionUser extension is
// always present here.

use axum::extract::Extension;

use crate::auth::identity::ProfileView;
use crate::middleware::{ApiResponse, ApiResult, SessionUser};

/// GET /profile - the signed-in user's profile
///
/// Output:
/// ```json
/// { "id": "1099", "displayName": "Ada Lovelace", "email": "ada@example.com", "photo": null }
/// ```
pub async fn get(Extension(user): Extension<SessionUser>) -> ApiResult<ProfileView> {
    Ok(ApiResponse::success(ProfileView::from(&user.identity)))
}
