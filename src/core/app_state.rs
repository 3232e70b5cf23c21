use std::env;
use std::sync::Arc;

use crate::core::config::ScoutConfig;
use crate::llm::{OpenAiCompatible, TextCompletion};
use crate::scraping::fetcher::PageFetcher;
use crate::tools::crawl::LinkedPageCrawler;

#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    /// File-based config loaded from `avurna-scout.json` (env-var fallback for all fields).
    pub config: Arc<ScoutConfig>,
    // Linked-page crawler with its visited-page cache
    pub crawler: Arc<LinkedPageCrawler>,
    // Concurrency control for external calls
    pub outbound_limit: Arc<tokio::sync::Semaphore>,
    // Optional hosted text completion (abstractive summaries only)
    pub llm: Option<Arc<dyn TextCompletion>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("llm_enabled", &self.llm.is_some())
            .field("outbound_permits", &self.outbound_limit.available_permits())
            .finish()
    }
}

impl AppState {
    pub fn new(http_client: reqwest::Client, config: ScoutConfig) -> Self {
        let outbound_limit = env::var("OUTBOUND_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(32);

        let crawler = Arc::new(LinkedPageCrawler::new(
            config.fetch.resolve_crawl_concurrency(),
            std::time::Duration::from_secs(config.fetch.resolve_cache_ttl_secs()),
        ));

        let llm: Option<Arc<dyn TextCompletion>> =
            OpenAiCompatible::from_config(http_client.clone(), &config.llm)
                .map(|c| Arc::new(c) as Arc<dyn TextCompletion>);

        Self {
            http_client,
            config: Arc::new(config),
            crawler,
            outbound_limit: Arc::new(tokio::sync::Semaphore::new(outbound_limit)),
            llm,
        }
    }

    /// Replace the text-completion capability (tests inject a stub here).
    pub fn with_llm(mut self, llm: Arc<dyn TextCompletion>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// A fetcher wired to this state's client, config and outbound limiter.
    pub fn page_fetcher(&self) -> PageFetcher {
        PageFetcher::new(self.http_client.clone(), &self.config.fetch)
            .with_outbound_limit(Arc::clone(&self.outbound_limit))
    }
}
