use crate::mcp::{McpCallResponse, McpContent};
use crate::types::ErrorResponse;
use axum::http::StatusCode;
use axum::response::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub type HandlerResult = Result<Json<McpCallResponse>, (StatusCode, Json<ErrorResponse>)>;

pub fn bad_request(error: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// Deserialize tool arguments, mapping schema mismatches to `400`.
pub fn parse_arguments<T: DeserializeOwned>(arguments: &Value) -> Result<T, (StatusCode, Json<ErrorResponse>)> {
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments.clone()
    };
    serde_json::from_value(arguments).map_err(|e| bad_request(format!("Invalid arguments: {}", e)))
}

/// Wrap a result as a single pretty-printed JSON text block.
pub fn json_content<T: Serialize>(value: &T, is_error: bool) -> HandlerResult {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to serialize result: {}", e),
            }),
        )
    })?;
    Ok(Json(McpCallResponse {
        content: vec![McpContent {
            content_type: "text".to_string(),
            text,
        }],
        is_error,
    }))
}
