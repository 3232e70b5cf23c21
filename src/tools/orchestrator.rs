//! Bounded escalation loop around fetch, extract, classify and judge.
//!
//! Each attempt gets a fresh [`PageExtract`]; nothing is merged across
//! attempts. When the judge says the result is not enough, the depth, page
//! budget and timeout are raised and the URL is fetched again, until the judge
//! is satisfied or a hard ceiling is reached.

use crate::analysis::sufficiency::{IntentSignal, SufficiencyJudge};
use crate::scraping::extractor::HtmlExtractor;
use crate::scraping::fetcher::{FetchError, PageSource};
use crate::tools::crawl::LinkedPageCrawler;
use crate::types::*;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Escalation steps and hard ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_recursion_depth: u32,
    pub page_ceiling: u32,
    pub depth_step: u32,
    pub page_step: u32,
    pub timeout_step_ms: u64,
    pub timeout_ceiling_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_recursion_depth: 5,
            page_ceiling: 20,
            depth_step: 1,
            page_step: 3,
            timeout_step_ms: 2_000,
            timeout_ceiling_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Pull caller-supplied params under the ceilings.
    pub fn clamp(&self, params: RetryParams) -> RetryParams {
        RetryParams {
            recursion_depth: params.recursion_depth.min(self.max_recursion_depth),
            max_pages: params.max_pages.min(self.page_ceiling),
            timeout_ms: params.timeout_ms,
        }
    }

    /// No further attempt is allowed after an insufficient one.
    pub fn is_exhausted(&self, params: &RetryParams, attempts_made: usize) -> bool {
        params.recursion_depth >= self.max_recursion_depth
            || params.max_pages >= self.page_ceiling
            || attempts_made >= self.max_recursion_depth.max(1) as usize
    }

    pub fn escalate(&self, params: RetryParams) -> RetryParams {
        RetryParams {
            recursion_depth: params
                .recursion_depth
                .saturating_add(self.depth_step)
                .min(self.max_recursion_depth),
            max_pages: params
                .max_pages
                .saturating_add(self.page_step)
                .min(self.page_ceiling),
            timeout_ms: params
                .timeout_ms
                .saturating_add(self.timeout_step_ms)
                .min(self.timeout_ceiling_ms.max(params.timeout_ms)),
        }
    }
}

/// What one attempt produced.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Page(PageExtract),
    /// Image, PDF or other file: terminal, never retried.
    Unsupported(NonHtmlContent),
    Failed(FetchError),
}

impl AttemptOutcome {
    /// Response `type` for this outcome.
    pub fn label(&self) -> &str {
        match self {
            AttemptOutcome::Page(_) => "website",
            AttemptOutcome::Unsupported(content) => &content.content_type,
            AttemptOutcome::Failed(_) => "error",
        }
    }

    pub fn extract(&self) -> Option<&PageExtract> {
        match self {
            AttemptOutcome::Page(extract) => Some(extract),
            _ => None,
        }
    }
}

/// One iteration of the loop. Appended to the log, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RetryAttempt {
    pub attempt_index: usize,
    pub params: RetryParams,
    pub outcome: AttemptOutcome,
    pub sufficient: bool,
    pub linked_pages: Vec<LinkedPageDigest>,
    pub duration_ms: u64,
}

impl RetryAttempt {
    pub fn record(&self) -> AttemptRecord {
        AttemptRecord {
            attempt_index: self.attempt_index,
            params: self.params,
            sufficient: self.sufficient,
            outcome: self.outcome.label().to_string(),
            site_type: self.outcome.extract().map(|e| e.site_type),
            error: match &self.outcome {
                AttemptOutcome::Failed(e) => Some(e.to_string()),
                _ => None,
            },
            linked_pages: self.linked_pages.len(),
            duration_ms: self.duration_ms,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrchestrationRequest {
    pub url: String,
    pub referer: Option<String>,
    /// Starting params, clamped to the policy ceilings before use.
    pub params: RetryParams,
    /// Treat the first attempt as insufficient regardless of content.
    pub force_deeper: bool,
}

#[derive(Debug, Clone)]
pub struct OrchestratedResult {
    /// Every attempt in order; the last one is the result.
    pub attempts: Vec<RetryAttempt>,
    /// One line per escalation.
    pub trace: Vec<String>,
    /// The loop hit a ceiling without a sufficient result.
    pub exhausted: bool,
}

impl OrchestratedResult {
    pub fn final_attempt(&self) -> Option<&RetryAttempt> {
        self.attempts.last()
    }

    pub fn records(&self) -> Vec<AttemptRecord> {
        self.attempts.iter().map(RetryAttempt::record).collect()
    }
}

pub fn escalation_trace_line(from: &RetryParams, to: &RetryParams) -> String {
    format!(
        "Not enough data found at depth {}, trying depth {} (maxPages {})...",
        from.recursion_depth, to.recursion_depth, to.max_pages
    )
}

pub struct RetryOrchestrator<'a> {
    source: &'a dyn PageSource,
    judge: &'a dyn SufficiencyJudge,
    crawler: Option<&'a LinkedPageCrawler>,
    policy: RetryPolicy,
    extractor: HtmlExtractor,
}

impl<'a> RetryOrchestrator<'a> {
    pub fn new(source: &'a dyn PageSource, judge: &'a dyn SufficiencyJudge, policy: RetryPolicy) -> Self {
        Self {
            source,
            judge,
            crawler: None,
            policy,
            extractor: HtmlExtractor::new(),
        }
    }

    /// Spend each HTML attempt's depth and page budget on linked pages.
    pub fn with_crawler(mut self, crawler: &'a LinkedPageCrawler) -> Self {
        self.crawler = Some(crawler);
        self
    }

    pub async fn run(&self, request: &OrchestrationRequest) -> OrchestratedResult {
        let mut params = self.policy.clamp(request.params);
        let mut intent = IntentSignal {
            forced_deeper: request.force_deeper,
        };
        let mut attempts: Vec<RetryAttempt> = Vec::new();
        let mut trace = Vec::new();

        loop {
            let attempt = self.attempt(attempts.len(), request, params, &intent).await;
            // The override applies to the first attempt only.
            intent.forced_deeper = false;

            let done = attempt.sufficient || matches!(attempt.outcome, AttemptOutcome::Unsupported(_));
            attempts.push(attempt);
            if done {
                return OrchestratedResult {
                    attempts,
                    trace,
                    exhausted: false,
                };
            }

            if self.policy.is_exhausted(&params, attempts.len()) {
                warn!(
                    "Giving up on {} after {} attempt(s) at depth {} (maxPages {})",
                    request.url,
                    attempts.len(),
                    params.recursion_depth,
                    params.max_pages
                );
                return OrchestratedResult {
                    attempts,
                    trace,
                    exhausted: true,
                };
            }

            let next = self.policy.escalate(params);
            let line = escalation_trace_line(&params, &next);
            info!("{}", line);
            trace.push(line);
            params = next;
        }
    }

    async fn attempt(
        &self,
        attempt_index: usize,
        request: &OrchestrationRequest,
        params: RetryParams,
        intent: &IntentSignal,
    ) -> RetryAttempt {
        let started = Instant::now();
        let timeout = Duration::from_millis(params.timeout_ms);
        info!(
            "Attempt {} for {} (depth {}, maxPages {}, timeout {}ms)",
            attempt_index, request.url, params.recursion_depth, params.max_pages, params.timeout_ms
        );

        let fetched = tokio::time::timeout(
            timeout,
            self.source.fetch(&request.url, request.referer.as_deref(), timeout),
        )
        .await
        .unwrap_or_else(|_| Err(FetchError::Timeout(params.timeout_ms)));

        let mut linked_pages = Vec::new();
        let outcome = match fetched {
            Ok(FetchEnvelope { url, content }) => match content {
                FetchedContent::Html { body } => {
                    let extract = self.extractor.extract(&body, &url);
                    if let Some(crawler) = self.crawler {
                        linked_pages = crawler.crawl(self.source, &extract, params).await;
                    }
                    AttemptOutcome::Page(extract)
                }
                FetchedContent::Image { markdown } => {
                    AttemptOutcome::Unsupported(NonHtmlContent::image(url, markdown))
                }
                FetchedContent::Pdf => AttemptOutcome::Unsupported(NonHtmlContent::pdf(url)),
                FetchedContent::GenericFile { mime_type, preview } => {
                    AttemptOutcome::Unsupported(NonHtmlContent::file(url, &mime_type, preview))
                }
            },
            Err(e) => {
                warn!("Attempt {} for {} failed: {}", attempt_index, request.url, e);
                AttemptOutcome::Failed(e)
            }
        };

        let sufficient = self.judge.is_sufficient(&outcome, intent);
        RetryAttempt {
            attempt_index,
            params,
            outcome,
            sufficient,
            linked_pages,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}
