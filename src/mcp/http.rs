use super::handlers;
use super::tooling::tool_catalog;
use crate::types::*;
use crate::AppState;
use axum::{
    extract::State,
    http::{header::HOST, HeaderMap, StatusCode},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
pub struct McpTool {
    pub name: String,
    pub title: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpToolsResponse {
    pub tools: Vec<McpTool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpCallResponse {
    pub content: Vec<McpContent>,
    pub is_error: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

pub async fn list_tools() -> Json<McpToolsResponse> {
    let tools = tool_catalog()
        .into_iter()
        .map(|tool| McpTool {
            name: tool.name.to_string(),
            title: tool.title.to_string(),
            description: tool.description.to_string(),
            input_schema: tool.input_schema,
        })
        .collect();
    Json(McpToolsResponse { tools })
}

/// `Host` header of the incoming request, used to refuse resolver self-calls.
pub fn request_host(headers: &HeaderMap) -> Option<String> {
    headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<McpCallRequest>,
) -> Result<Json<McpCallResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!("MCP tool call: {} with args: {:?}", request.name, request.arguments);
    let own_host = request_host(&headers);

    match request.name.as_str() {
        "analyze_url" => handlers::analyze_url::handle(state, &request.arguments).await,
        "resolve_redirect" => {
            handlers::resolve_redirect::handle(state, &request.arguments, own_host.as_deref()).await
        }
        "resolve_redirect_batch" => {
            handlers::resolve_redirect::handle_batch(state, &request.arguments, own_host.as_deref())
                .await
        }
        "chart_table" => handlers::chart_table::handle(&request.arguments),
        "aggregate_tool_invocations" => handlers::aggregate::handle(&request.arguments),
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Unknown tool: {}", request.name),
            }),
        )),
    }
}
