pub mod aggregate;
pub mod analyze;
pub mod crawl;
pub mod intent;
pub mod orchestrator;
