pub mod auth;
pub mod response;

pub use auth::{require_session, session_middleware, CurrentSession, SessionUser};
pub use response::{ApiResponse, ApiResult};
