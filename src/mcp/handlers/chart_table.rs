use super::common::{json_content, parse_arguments, HandlerResult};
use crate::chart::{render_bar_chart, suggest_column, DEFAULT_MAX_BARS, DEFAULT_MAX_WIDTH};
use crate::types::{ChartRequest, ChartResponse};
use serde_json::Value;

/// Shared by the `/chart` route and the `chart_table` tool.
pub fn chart(request: &ChartRequest) -> ChartResponse {
    let column = request
        .column
        .clone()
        .filter(|c| !c.is_empty())
        .or_else(|| suggest_column(&request.table, &request.user_intent));
    let chart = column.as_deref().and_then(|c| {
        render_bar_chart(
            &request.table,
            c,
            request.max_bars.unwrap_or(DEFAULT_MAX_BARS),
            request.max_width.unwrap_or(DEFAULT_MAX_WIDTH),
        )
    });
    ChartResponse { column, chart }
}

pub fn handle(arguments: &Value) -> HandlerResult {
    let request: ChartRequest = parse_arguments(arguments)?;
    json_content(&chart(&request), false)
}
