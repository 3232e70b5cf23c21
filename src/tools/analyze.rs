//! End-to-end analysis of one URL: resolve parameters from the request,
//! run the retry loop, and shape the caller-facing response.

use crate::analysis::chart::chart_for_intent;
use crate::core::text::preview;
use crate::analysis::sufficiency::{HeuristicJudge, SufficiencyJudge};
use crate::llm::{abstract_summary, TextCompletion};
use crate::scraping::fetcher::PageSource;
use crate::tools::crawl::LinkedPageCrawler;
use crate::tools::intent::{autocomplete_url, extract_recursion_params, extract_url, resolve_params, suggest_links, wants_deeper};
use crate::tools::orchestrator::{AttemptOutcome, OrchestrationRequest, RetryOrchestrator, RetryPolicy};
use crate::types::*;
use crate::AppState;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

const PREVIEW_CHARS: usize = 1_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("No URL given and none found in the message")]
    MissingUrl,
}

/// Collaborators for [`analyze_with`].
pub struct Analyzer<'a> {
    pub source: &'a dyn PageSource,
    pub judge: &'a dyn SufficiencyJudge,
    pub crawler: Option<&'a LinkedPageCrawler>,
    pub policy: RetryPolicy,
    pub llm: Option<&'a Arc<dyn TextCompletion>>,
}

/// Analyze with the live fetcher, crawler, config and LLM from `state`.
pub async fn analyze_url(
    state: &Arc<AppState>,
    request: &AnalyzeRequest,
) -> Result<AnalyzeResponse, AnalyzeError> {
    let fetcher = state.page_fetcher();
    let judge = HeuristicJudge;
    let analyzer = Analyzer {
        source: &fetcher,
        judge: &judge,
        crawler: Some(state.crawler.as_ref()),
        policy: state.config.retry.to_policy(),
        llm: state.llm.as_ref(),
    };
    analyze_with(&analyzer, request).await
}

pub async fn analyze_with(
    analyzer: &Analyzer<'_>,
    request: &AnalyzeRequest,
) -> Result<AnalyzeResponse, AnalyzeError> {
    let message = request.message.clone().unwrap_or_default();
    let url = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(autocomplete_url)
        .or_else(|| extract_url(&message))
        .ok_or(AnalyzeError::MissingUrl)?;
    let user_intent = request
        .user_intent
        .clone()
        .filter(|i| !i.trim().is_empty())
        .unwrap_or_else(|| message.clone());

    // Request fields win over overrides typed into the message.
    let inline = extract_recursion_params(&message);
    let explicit = PartialRetryParams {
        recursion_depth: request.recursion_depth.or(inline.recursion_depth),
        max_pages: request.max_pages.or(inline.max_pages),
        timeout_ms: request.timeout_ms.or(inline.timeout_ms),
    };
    let params = resolve_params(&url, &user_intent, explicit);

    let orchestration = OrchestrationRequest {
        url: url.clone(),
        referer: request.referer.clone(),
        params,
        force_deeper: wants_deeper(&message),
    };
    let mut orchestrator = RetryOrchestrator::new(analyzer.source, analyzer.judge, analyzer.policy);
    if let Some(crawler) = analyzer.crawler {
        orchestrator = orchestrator.with_crawler(crawler);
    }
    let result = orchestrator.run(&orchestration).await;

    let mut response = AnalyzeResponse {
        request_id: uuid::Uuid::new_v4().to_string(),
        response_type: "error".to_string(),
        url: url.clone(),
        site_type: SiteType::General,
        extract: None,
        content: None,
        error: None,
        attempt_log: result.records(),
        trace: result.trace.clone(),
        linked_pages: Vec::new(),
        exhausted: result.exhausted,
        chart_markdown: None,
        suggested_links: Vec::new(),
        abstract_summary: None,
        preview: None,
        fetched_at: chrono::Utc::now().to_rfc3339(),
    };

    let Some(last) = result.attempts.into_iter().last() else {
        return Ok(response);
    };
    response.response_type = last.outcome.label().to_string();
    response.linked_pages = last.linked_pages;

    match last.outcome {
        AttemptOutcome::Page(extract) => {
            response.site_type = extract.site_type;
            response.chart_markdown = chart_for_intent(&extract.tables, &user_intent);
            response.suggested_links = suggest_links(&extract.nav_links, &user_intent);
            response.preview = Some(preview(&extract.main_text, PREVIEW_CHARS));
            if request.summarize {
                if let Some(llm) = analyzer.llm {
                    response.abstract_summary = abstract_summary(llm, &extract.main_text).await;
                }
            }
            response.url = extract.url.clone();
            response.extract = Some(extract);
        }
        AttemptOutcome::Unsupported(content) => {
            response.url = content.url.clone();
            response.content = Some(content);
        }
        AttemptOutcome::Failed(e) => {
            response.error = Some(e.to_string());
        }
    }

    info!(
        "Analysis of {} finished: type={} site_type={} attempts={} exhausted={}",
        url,
        response.response_type,
        response.site_type,
        response.attempt_log.len(),
        response.exhausted
    );
    Ok(response)
}
