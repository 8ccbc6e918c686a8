use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::auth::Provider;
use crate::state::AppState;

/// GET / - service description
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");
    let login: Vec<String> = Provider::ALL
        .iter()
        .map(|p| format!("/auth/{}", p))
        .collect();

    Json(json!({
        "name": "Session CRUD API",
        "version": version,
        "frontend": state.config.security.frontend_url,
        "endpoints": {
            "items": "/items[/:id], /api/items[/:id] (public)",
            "analyses": "/api/analyses[/:id] (public)",
            "login": login,
            "profile": "/profile (session required)",
            "logout": "/logout",
            "health": "/health",
        }
    }))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
