// handlers/public/items.rs - /items and /api/items

use axum::extract::{Path, State};

use super::resource;
use crate::handlers::payload::Payload;
use crate::middleware::ApiResult;
use crate::state::AppState;
use crate::store::Record;

/// GET /items
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Record>> {
    resource::list(&state.items).await
}

/// POST /items
pub async fn create(State(state): State<AppState>, Payload(fields): Payload) -> ApiResult<Record> {
    resource::create(&state.items, fields).await
}

/// PUT /items/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(fields): Payload,
) -> ApiResult<Record> {
    resource::update(&state.items, &id, fields).await
}

/// DELETE /items/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    resource::delete(&state.items, &id).await
}
