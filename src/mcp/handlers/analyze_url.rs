use super::common::{bad_request, json_content, parse_arguments, HandlerResult};
use crate::types::AnalyzeRequest;
use crate::{analyze, AppState};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

pub async fn handle(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    let request: AnalyzeRequest = parse_arguments(arguments)?;

    let response = analyze::analyze_url(&state, &request).await.map_err(|e| {
        warn!("analyze_url rejected: {}", e);
        bad_request(e.to_string())
    })?;

    // Fetch failures come back as a typed `error` result, not a transport error.
    let is_error = response.error.is_some();
    json_content(&response, is_error)
}
