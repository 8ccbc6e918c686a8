// handlers/protected/mod.rs - Protected handlers (session required)
//
// Security Level: valid `session` cookie bound to a live server-side session.
// Middleware: `require_session` route layer; anything else gets
// 401 {"error": "Not authenticated"}.

pub mod profile;
