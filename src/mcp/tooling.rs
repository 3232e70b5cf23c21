use serde_json::Value;

#[derive(Clone, Debug)]
pub struct ToolCatalogEntry {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

pub fn tool_catalog() -> Vec<ToolCatalogEntry> {
    vec![
        ToolCatalogEntry {
            name: "analyze_url",
            title: "Analyze URL",
            description: "Fetch a page, extract tables, products, FAQs and links, and dig deeper until the result is sufficient.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string"},
                    "message": {"type": "string", "description": "Latest user message; used to find a URL, the intent and inline overrides"},
                    "referer": {"type": "string"},
                    "user_intent": {"type": "string"},
                    "recursion_depth": {"type": "integer", "minimum": 0},
                    "max_pages": {"type": "integer", "minimum": 1},
                    "timeout_ms": {"type": "integer", "minimum": 1},
                    "summarize": {"type": "boolean", "default": false}
                }
            }),
        },
        ToolCatalogEntry {
            name: "resolve_redirect",
            title: "Resolve Redirect",
            description: "Follow redirects and return the final URL.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string"}
                },
                "required": ["url"]
            }),
        },
        ToolCatalogEntry {
            name: "resolve_redirect_batch",
            title: "Resolve Redirects (Batch)",
            description: "Resolve many URLs in parallel. Failures map to the original URL.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "urls": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["urls"]
            }),
        },
        ToolCatalogEntry {
            name: "chart_table",
            title: "Chart Table",
            description: "Pick the column a request refers to and render a text bar chart.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "table": {
                        "type": "object",
                        "properties": {
                            "headers": {"type": "array", "items": {"type": "string"}},
                            "rows": {"type": "array", "items": {"type": "object"}}
                        },
                        "required": ["headers", "rows"]
                    },
                    "user_intent": {"type": "string"},
                    "column": {"type": "string"},
                    "max_bars": {"type": "integer", "minimum": 1, "default": 10},
                    "max_width": {"type": "integer", "minimum": 1, "default": 30}
                },
                "required": ["table"]
            }),
        },
        ToolCatalogEntry {
            name: "aggregate_tool_invocations",
            title: "Aggregate Tool Invocations",
            description: "Group tool invocations into per-tool progress rows with completed/total counts.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "invocations": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "tool_name": {"type": "string"},
                                "state": {"type": "string", "enum": ["pending", "result"]},
                                "args": {"type": "object"}
                            },
                            "required": ["tool_name", "state"]
                        }
                    }
                },
                "required": ["invocations"]
            }),
        },
    ]
}
