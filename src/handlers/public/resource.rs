// handlers/public/resource.rs - CRUD shared by every record collection
//
// Items and analyses are both plain ResourceStores; the per-collection
// handlers pick the store and delegate here.

use crate::middleware::{ApiResponse, ApiResult};
use crate::store::{Record, ResourceStore};
use serde_json::{Map, Value};

/// GET /<collection> - all records in insertion order
pub async fn list(store: &ResourceStore) -> ApiResult<Vec<Record>> {
    Ok(ApiResponse::success(store.list().await))
}

/// POST /<collection> - 201 with the new record; any field shape is accepted
pub async fn create(store: &ResourceStore, fields: Map<String, Value>) -> ApiResult<Record> {
    let record = store.create(fields).await;
    Ok(ApiResponse::created(record))
}

/// PUT /<collection>/:id - 200 with the merged record, 404 for unknown or non-numeric ids
pub async fn update(store: &ResourceStore, id: &str, fields: Map<String, Value>) -> ApiResult<Record> {
    let record = store.update(id, fields).await?;
    Ok(ApiResponse::success(record))
}

/// DELETE /<collection>/:id - always 204, whether or not the record existed
pub async fn delete(store: &ResourceStore, id: &str) -> ApiResult<()> {
    let outcome = store.delete(id).await;
    tracing::debug!("{}: delete {} -> {:?}", store.name(), id, outcome);
    Ok(ApiResponse::<()>::no_content())
}
