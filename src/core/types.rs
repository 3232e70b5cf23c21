use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ───────────────────────────────────────────────────────────────────────────
// Page extraction
// ───────────────────────────────────────────────────────────────────────────

/// Coarse site-type label derived from a [`PageExtract`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SiteType {
    #[serde(rename = "e-commerce")]
    ECommerce,
    #[serde(rename = "news/blog")]
    NewsBlog,
    #[serde(rename = "docs/faq")]
    DocsFaq,
    #[serde(rename = "data/table")]
    DataTable,
    #[default]
    #[serde(rename = "general")]
    General,
}

impl SiteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteType::ECommerce => "e-commerce",
            SiteType::NewsBlog => "news/blog",
            SiteType::DocsFaq => "docs/faq",
            SiteType::DataTable => "data/table",
            SiteType::General => "general",
        }
    }
}

impl std::fmt::Display for SiteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1, 2 or 3.
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ProductCard {
    pub name: String,
    pub price: String,
    pub features: Vec<String>,
    pub image_url: String,
}

/// A data table. Rows are keyed by header text, or by synthetic
/// `Column N` names when the header cell is empty or missing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<BTreeMap<String, String>>,
}

/// Normalized, structured view of one HTML page.
///
/// Built once per fetch attempt and never mutated afterwards; a later retry
/// attempt produces a fresh value instead of merging into this one.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PageExtract {
    pub url: String,
    pub site_type: SiteType,
    pub title: String,
    pub meta_description: String,
    pub og_title: String,
    pub og_description: String,
    pub headings: Vec<Heading>,
    pub nav_links: Vec<NavLink>,
    pub product_cards: Vec<ProductCard>,
    pub faqs: Vec<String>,
    pub news_sections: Vec<String>,
    pub tables: Vec<Table>,
    pub main_text: String,
    pub summary: String,
    /// ISO 639-3 code of the main text, `und` when undetermined.
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub article_links: Vec<NavLink>,
    /// Raw HTML mentioned news/blog/article somewhere (classifier input).
    #[serde(default)]
    pub mentions_news: bool,
}

// ───────────────────────────────────────────────────────────────────────────
// Fetching
// ───────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    Pdf,
    GenericFile,
    Html,
}

/// Payload of a fetch. Exactly one variant is populated, matching the
/// response content-type.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedContent {
    /// Only a markdown reference to the image is kept, never the bytes.
    Image { markdown: String },
    Pdf,
    GenericFile {
        mime_type: String,
        /// First 500 characters when the body decodes as text.
        preview: Option<String>,
    },
    Html { body: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchEnvelope {
    /// Final URL after any redirects followed by the HTTP client.
    pub url: String,
    pub content: FetchedContent,
}

impl FetchEnvelope {
    pub fn kind(&self) -> ContentKind {
        match self.content {
            FetchedContent::Image { .. } => ContentKind::Image,
            FetchedContent::Pdf => ContentKind::Pdf,
            FetchedContent::GenericFile { .. } => ContentKind::GenericFile,
            FetchedContent::Html { .. } => ContentKind::Html,
        }
    }
}

/// Typed stand-in for a non-HTML response. Never an error; callers must not
/// expect tables or product data from it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NonHtmlContent {
    /// `image`, `document` or `file`.
    #[serde(rename = "type")]
    pub content_type: String,
    pub url: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl NonHtmlContent {
    pub fn image(url: String, markdown: String) -> Self {
        Self {
            content_type: "image".to_string(),
            url,
            description: markdown,
            preview: None,
        }
    }

    pub fn pdf(url: String) -> Self {
        Self {
            content_type: "document".to_string(),
            url,
            description: "Link is a PDF. Content analysis not supported.".to_string(),
            preview: None,
        }
    }

    pub fn file(url: String, mime_type: &str, preview: Option<String>) -> Self {
        Self {
            content_type: "file".to_string(),
            url,
            description: format!("Link is a file of type {}.", mime_type),
            preview,
        }
    }
}

// ───────────────────────────────────────────────────────────────────────────
// Retry loop
// ───────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RetryParams {
    pub recursion_depth: u32,
    pub max_pages: u32,
    pub timeout_ms: u64,
}

impl Default for RetryParams {
    fn default() -> Self {
        Self {
            recursion_depth: 1,
            max_pages: 5,
            timeout_ms: 10_000,
        }
    }
}

/// Caller-supplied overrides; `None` means "use the smart default".
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartialRetryParams {
    #[serde(default)]
    pub recursion_depth: Option<u32>,
    #[serde(default)]
    pub max_pages: Option<u32>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Digest of a same-site page visited while spending an attempt's crawl budget.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LinkedPageDigest {
    pub url: String,
    pub depth: u32,
    pub title: String,
    pub site_type: SiteType,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Serializable view of one attempt for the caller's trace.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AttemptRecord {
    pub attempt_index: usize,
    pub params: RetryParams,
    pub sufficient: bool,
    /// `website`, `image`, `document`, `file` or `error`.
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_type: Option<SiteType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub linked_pages: usize,
    pub duration_ms: u64,
}

// ───────────────────────────────────────────────────────────────────────────
// HTTP / tool surface
// ───────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AnalyzeRequest {
    /// Target URL. When absent, the first URL or bare domain in `message` is used.
    #[serde(default)]
    pub url: Option<String>,
    /// Latest user message, used for URL discovery, intent and inline overrides.
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub referer: Option<String>,
    #[serde(default)]
    pub user_intent: Option<String>,
    #[serde(default)]
    pub recursion_depth: Option<u32>,
    #[serde(default)]
    pub max_pages: Option<u32>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Ask the configured LLM for an abstractive summary.
    #[serde(default)]
    pub summarize: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalyzeResponse {
    pub request_id: String,
    /// `website`, `image`, `document`, `file` or `error`.
    #[serde(rename = "type")]
    pub response_type: String,
    pub url: String,
    pub site_type: SiteType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<PageExtract>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<NonHtmlContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// One record per attempt, in attempt order.
    pub attempt_log: Vec<AttemptRecord>,
    /// Human-readable escalation trace.
    pub trace: Vec<String>,
    #[serde(default)]
    pub linked_pages: Vec<LinkedPageDigest>,
    pub exhausted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_markdown: Option<String>,
    #[serde(default)]
    pub suggested_links: Vec<NavLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_summary: Option<String>,
    /// Leading slice of the page's main text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    pub fetched_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveRedirectRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveRedirectResponse {
    pub resolved_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveRedirectBatchRequest {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveRedirectBatchResponse {
    pub resolved: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChartRequest {
    pub table: Table,
    #[serde(default)]
    pub user_intent: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub max_bars: Option<usize>,
    #[serde(default)]
    pub max_width: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChartResponse {
    pub column: Option<String>,
    pub chart: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
