//! `POST /api/{operation}`

use crate::{state::AppState, Error};
use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value as JsonValue};

/// Everything after `/api/` is the operation name, so `/api/`, `/api/login/`
/// and `/api/login/extra` name operations that do not exist.
pub async fn dispatch_operation(State(state): State<AppState>, uri: Uri, body: Bytes) -> Response {
    let operation = operation_name(&uri);
    let payload = parse_payload(&body);

    match state.dispatcher.dispatch(operation, payload).await {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(Error::UnknownOperation(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Endpoint not found" })),
        )
            .into_response(),
        Err(Error::Internal(message)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response(),
        Err(other) => other.into_response(),
    }
}

pub fn operation_name(uri: &Uri) -> &str {
    uri.path().strip_prefix("/api/").unwrap_or_default()
}

/// Bodies that are empty, unparseable, or not a JSON object count as `{}`.
pub fn parse_payload(body: &[u8]) -> JsonValue {
    match serde_json::from_slice::<JsonValue>(body) {
        Ok(value @ JsonValue::Object(_)) => value,
        _ => JsonValue::Object(Default::default()),
    }
}
