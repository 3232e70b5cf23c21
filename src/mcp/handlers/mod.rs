pub mod aggregate;
pub mod analyze_url;
pub mod chart_table;
pub mod common;
pub mod resolve_redirect;
