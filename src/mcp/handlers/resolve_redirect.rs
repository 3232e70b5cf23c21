use super::common::{bad_request, json_content, parse_arguments, HandlerResult};
use crate::redirect::{is_self_call, resolve_redirect, resolve_redirect_batch, BATCH_CONCURRENCY};
use crate::types::{
    ResolveRedirectBatchRequest, ResolveRedirectBatchResponse, ResolveRedirectRequest,
    ResolveRedirectResponse,
};
use crate::AppState;
use serde_json::Value;
use std::sync::Arc;

pub async fn handle(state: Arc<AppState>, arguments: &Value, own_host: Option<&str>) -> HandlerResult {
    let request: ResolveRedirectRequest = parse_arguments(arguments)?;
    if is_self_call(&request.url, own_host) {
        return Err(bad_request("Recursive redirect resolution detected."));
    }

    let resolved_url = resolve_redirect(&state.http_client, &request.url)
        .await
        .map_err(|e| bad_request(e.to_string()))?;
    json_content(&ResolveRedirectResponse { resolved_url }, false)
}

pub async fn handle_batch(
    state: Arc<AppState>,
    arguments: &Value,
    own_host: Option<&str>,
) -> HandlerResult {
    let request: ResolveRedirectBatchRequest = parse_arguments(arguments)?;
    let resolved =
        resolve_redirect_batch(&state.http_client, request.urls, BATCH_CONCURRENCY, own_host).await;
    json_content(&ResolveRedirectBatchResponse { resolved }, false)
}
