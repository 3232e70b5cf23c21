pub mod handlers;
pub mod http;
pub mod tooling;

pub use http::{call_tool, list_tools, McpCallRequest, McpCallResponse, McpContent, McpTool, McpToolsResponse};
