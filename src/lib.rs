/// Compile a regex once and hand out a `&'static` reference to it.
macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static regex::Regex {
            static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            RE.get_or_init(|| regex::Regex::new($pattern).expect("valid static regex"))
        }
    };
}

pub mod analysis;
pub mod core;
pub mod llm;
pub mod mcp;
pub mod scraping;
pub mod server;
pub mod tools;

// --- Primary core exports ---
pub use crate::core::types;
pub use crate::core::types::*;
pub use crate::core::AppState;

// --- Short module paths ---
pub use analysis::{chart, classifier, sufficiency};
pub use scraping::{extractor, fetcher, redirect};
pub use tools::{aggregate, analyze, crawl, intent, orchestrator};
