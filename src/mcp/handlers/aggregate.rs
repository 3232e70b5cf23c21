use super::common::{json_content, parse_arguments, HandlerResult};
use crate::aggregate::{aggregate, AggregateRequest};
use serde_json::Value;

pub fn handle(arguments: &Value) -> HandlerResult {
    let request: AggregateRequest = parse_arguments(arguments)?;
    json_content(&aggregate(&request.invocations), false)
}
