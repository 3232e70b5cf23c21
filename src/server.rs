//! HTTP routes. `main` only binds and serves [`router`].

use crate::aggregate::{aggregate, AggregateRequest, AggregatedView};
use crate::mcp;
use crate::mcp::handlers::chart_table::chart;
use crate::mcp::http::request_host;
use crate::redirect::{is_self_call, resolve_redirect, resolve_redirect_batch, BATCH_CONCURRENCY};
use crate::types::*;
use crate::{analyze, AppState};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/analyze", post(analyze_handler))
        .route("/resolve-redirect", post(resolve_redirect_handler))
        .route("/resolve-redirect/batch", post(resolve_redirect_batch_handler))
        .route("/chart", post(chart_handler))
        .route("/aggregate", post(aggregate_handler))
        .route("/mcp/tools", get(mcp::list_tools))
        .route("/mcp/call", post(mcp::call_tool))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "avurna-scout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    match analyze::analyze_url(&state, &request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            warn!("Analyze request rejected: {}", e);
            Err(error_response(StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

async fn resolve_redirect_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ResolveRedirectRequest>,
) -> Result<Json<ResolveRedirectResponse>, ApiError> {
    if request.url.trim().is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Missing url parameter."));
    }
    if is_self_call(&request.url, request_host(&headers).as_deref()) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Recursive redirect resolution detected.",
        ));
    }

    match resolve_redirect(&state.http_client, &request.url).await {
        Ok(resolved_url) => Ok(Json(ResolveRedirectResponse { resolved_url })),
        Err(e) => {
            error!("Redirect resolution error: {:#}", e);
            Err(error_response(StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

async fn resolve_redirect_batch_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ResolveRedirectBatchRequest>,
) -> Json<ResolveRedirectBatchResponse> {
    let own_host = request_host(&headers);
    let resolved = resolve_redirect_batch(
        &state.http_client,
        request.urls,
        BATCH_CONCURRENCY,
        own_host.as_deref(),
    )
    .await;
    Json(ResolveRedirectBatchResponse { resolved })
}

async fn chart_handler(Json(request): Json<ChartRequest>) -> Json<ChartResponse> {
    Json(chart(&request))
}

async fn aggregate_handler(Json(request): Json<AggregateRequest>) -> Json<AggregatedView> {
    Json(aggregate(&request.invocations))
}
