// handlers/public/analyses.rs - /api/analyses
//
// Same collection semantics as items, except that creation runs a text
// operation and stores its result alongside the input.

use axum::extract::{Path, State};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::resource;
use crate::analysis::AnalysisError;
use crate::error::ApiError;
use crate::handlers::payload::Payload;
use crate::middleware::ApiResult;
use crate::state::AppState;
use crate::store::Record;

/// GET /api/analyses
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Record>> {
    resource::list(&state.analyses).await
}

/// POST /api/analyses - run `operation` over `inputText` and store the result
///
/// Input:
/// ```json
/// { "inputText": "I love this app. It never crashes.", "operation": "summary" }
/// ```
///
/// Output (201):
/// ```json
/// {
///   "id": 1718000000000,
///   "inputText": "I love this app. It never crashes.",
///   "operation": "summary",
///   "result": { "summary": "I love this app. It never crashes." },
///   "createdAt": "2024-06-10T06:13:20.000Z"
/// }
/// ```
pub async fn create(State(state): State<AppState>, Payload(body): Payload) -> ApiResult<Record> {
    let (input_text, operation) = match (present(&body, "inputText"), present(&body, "operation")) {
        (Some(text), Some(op)) => (text, op),
        _ => return Err(ApiError::bad_request("inputText and operation are required")),
    };

    // Supplied but not a string fails like any other analysis error
    let input_text = input_text
        .as_str()
        .ok_or_else(|| AnalysisError::NotText(input_text.to_string()))?
        .to_string();
    let operation = operation
        .as_str()
        .ok_or_else(|| AnalysisError::UnknownOperation(operation.to_string()))?
        .to_string();

    let result = state.analyzer.analyze(&input_text, &operation)?;

    let mut fields = Map::new();
    fields.insert("inputText".to_string(), Value::String(input_text));
    fields.insert("operation".to_string(), Value::String(operation));
    fields.insert("result".to_string(), result);
    fields.insert(
        "createdAt".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );

    resource::create(&state.analyses, fields).await
}

/// PUT /api/analyses/:id - e.g. attach notes to an analysis
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(fields): Payload,
) -> ApiResult<Record> {
    resource::update(&state.analyses, &id, fields).await
}

/// DELETE /api/analyses/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    resource::delete(&state.analyses, &id).await
}

/// A field that counts as supplied: present and not null, `false`, `0` or `""`.
fn present<'a>(body: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    body.get(field).filter(|value| match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}
