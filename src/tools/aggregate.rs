//! Grouped progress view over a list of tool invocations.
//!
//! Pure aggregation: the same invocation list always yields the same view.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolState {
    #[serde(alias = "call", alias = "partial-call")]
    Pending,
    Result,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolInvocation {
    #[serde(alias = "toolName")]
    pub tool_name: String,
    pub state: ToolState,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RowStatus {
    Complete,
    InProgress,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProgressRow {
    pub text: String,
    pub status: RowStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ToolGroup {
    pub tool_name: String,
    /// `Researching` for search tools, `Using <tool>` otherwise.
    pub label: String,
    pub completed: usize,
    pub total: usize,
    pub rows: Vec<ProgressRow>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct AggregatedView {
    pub groups: Vec<ToolGroup>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AggregateRequest {
    pub invocations: Vec<ToolInvocation>,
}

fn is_search_tool(tool_name: &str) -> bool {
    tool_name.to_lowercase().contains("search")
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn row_texts(invocation: &ToolInvocation) -> Vec<String> {
    if is_search_tool(&invocation.tool_name) {
        if let Some(queries) = invocation.args.get("queries").and_then(Value::as_array) {
            return queries.iter().map(value_text).collect();
        }
    }
    let text = ["query", "url"]
        .iter()
        .filter_map(|key| invocation.args.get(*key))
        .find(|v| !v.is_null() && v.as_str() != Some(""))
        .map(value_text)
        .unwrap_or_else(|| invocation.tool_name.clone());
    vec![text]
}

/// Group by tool name in first-seen order. A search tool's `queries` list is
/// flattened into one row per query.
pub fn aggregate(invocations: &[ToolInvocation]) -> AggregatedView {
    let mut groups: Vec<ToolGroup> = Vec::new();

    for invocation in invocations {
        let index = match groups.iter().position(|g| g.tool_name == invocation.tool_name) {
            Some(i) => i,
            None => {
                let label = if is_search_tool(&invocation.tool_name) {
                    "Researching".to_string()
                } else {
                    format!("Using {}", invocation.tool_name)
                };
                groups.push(ToolGroup {
                    tool_name: invocation.tool_name.clone(),
                    label,
                    completed: 0,
                    total: 0,
                    rows: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let status = match invocation.state {
            ToolState::Result => RowStatus::Complete,
            ToolState::Pending => RowStatus::InProgress,
        };
        let group = &mut groups[index];
        group
            .rows
            .extend(row_texts(invocation).into_iter().map(|text| ProgressRow { text, status }));
    }

    for group in &mut groups {
        group.total = group.rows.len();
        group.completed = group
            .rows
            .iter()
            .filter(|r| r.status == RowStatus::Complete)
            .count();
    }

    AggregatedView { groups }
}
