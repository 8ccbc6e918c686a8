use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::store::fields_from_value;

/// Request body as an open field map.
///
/// JSON bodies are parsed as-is (non-object JSON yields no fields),
/// `application/x-www-form-urlencoded` bodies become string fields, and an
/// empty body is an empty map. A body is read as JSON only when it is
/// declared `application/json` or carries no content type; any other type
/// is ignored. Only unparseable JSON is rejected (400).
#[derive(Debug, Clone, Default)]
pub struct Payload(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = body_kind(req.headers());

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        match kind {
            BodyKind::Json => parse_json(&bytes).map(Payload),
            BodyKind::Form => Ok(Payload(parse_form(&bytes))),
            BodyKind::Other => Ok(Payload::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let Some(content_type) = headers.get(header::CONTENT_TYPE) else {
        return BodyKind::Json;
    };

    let essence = content_type
        .to_str()
        .unwrap_or_default()
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "application/json" => BodyKind::Json,
        "application/x-www-form-urlencoded" => BodyKind::Form,
        _ => BodyKind::Other,
    }
}

fn parse_form(bytes: &[u8]) -> Map<String, Value> {
    url::form_urlencoded::parse(bytes)
        .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
        .collect()
}

fn parse_json(bytes: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    serde_json::from_slice::<Value>(bytes)
        .map(fields_from_value)
        .map_err(|e| {
            tracing::debug!("Rejected request body: {}", e);
            ApiError::invalid_json("Invalid JSON body")
        })
}
