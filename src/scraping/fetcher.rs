use crate::core::config::FetchConfig;
use crate::core::text::truncate_chars;
use crate::scraping::stealth::UserAgentPolicy;
use crate::types::{ContentKind, FetchEnvelope, FetchedContent};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, REFERER, USER_AGENT};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Characters kept from a non-HTML text body.
pub const FILE_PREVIEW_CHARS: usize = 500;

/// Transport-level failure of a single fetch. Never fatal to the caller: the
/// retry loop turns it into an insufficient attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Fetch error: {0}")]
    Network(String),
    #[error("HTTP error {0}")]
    Status(u16),
    #[error("Failed to read response body: {0}")]
    Decode(String),
    #[error("Fetch timed out after {0}ms")]
    Timeout(u64),
}

/// Anything that can turn a URL into a [`FetchEnvelope`].
///
/// The live implementation is [`PageFetcher`]; tests plug in canned pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        referer: Option<&str>,
        timeout: Duration,
    ) -> Result<FetchEnvelope, FetchError>;
}

/// Classify a `Content-Type` header value. Missing or empty means HTML.
pub fn classify_content_type(content_type: &str) -> ContentKind {
    let ct = content_type.trim().to_ascii_lowercase();
    if ct.is_empty() {
        ContentKind::Html
    } else if ct.starts_with("image/") {
        ContentKind::Image
    } else if ct.contains("application/pdf") {
        ContentKind::Pdf
    } else if ct.contains("text/html") || ct.contains("application/xhtml") {
        ContentKind::Html
    } else {
        ContentKind::GenericFile
    }
}

/// Text preview for a generic file, `None` when the bytes are not UTF-8.
pub fn file_preview(body: &[u8]) -> Option<String> {
    std::str::from_utf8(body)
        .ok()
        .map(|text| truncate_chars(text, FILE_PREVIEW_CHARS))
}

/// Markdown reference used in place of image bytes.
pub fn image_markdown(url: &str) -> String {
    format!("![image]({})", url)
}

/// HTTP GET fetcher with content-type classification.
pub struct PageFetcher {
    client: Client,
    user_agent: UserAgentPolicy,
    outbound_limit: Option<Arc<tokio::sync::Semaphore>>,
}

impl PageFetcher {
    pub fn new(client: Client, config: &FetchConfig) -> Self {
        let user_agent = if config.resolve_rotate_user_agent() {
            UserAgentPolicy::Rotate
        } else {
            UserAgentPolicy::Fixed(config.resolve_user_agent())
        };
        Self {
            client,
            user_agent,
            outbound_limit: None,
        }
    }

    pub fn with_outbound_limit(mut self, limit: Arc<tokio::sync::Semaphore>) -> Self {
        self.outbound_limit = Some(limit);
        self
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(
        &self,
        url: &str,
        referer: Option<&str>,
        timeout: Duration,
    ) -> Result<FetchEnvelope, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: "URL must use HTTP or HTTPS protocol".to_string(),
            });
        }

        let _permit = match &self.outbound_limit {
            Some(limit) => Some(
                limit
                    .acquire()
                    .await
                    .map_err(|_| FetchError::Network("outbound limiter closed".to_string()))?,
            ),
            None => None,
        };

        let timeout_ms = timeout.as_millis() as u64;
        let mut request = self
            .client
            .get(parsed)
            .header(USER_AGENT, self.user_agent.pick())
            .timeout(timeout);
        if let Some(referer) = referer.filter(|r| !r.trim().is_empty()) {
            request = request.header(REFERER, referer);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(timeout_ms)
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Fetch of {} returned HTTP {}", url, status.as_u16());
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let kind = classify_content_type(&content_type);
        debug!("Fetched {} ({:?}, content-type '{}')", final_url, kind, content_type);

        let read_error = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout(timeout_ms)
            } else {
                FetchError::Decode(e.to_string())
            }
        };

        let content = match kind {
            ContentKind::Image => FetchedContent::Image {
                markdown: image_markdown(&final_url),
            },
            ContentKind::Pdf => FetchedContent::Pdf,
            ContentKind::GenericFile => {
                let bytes = response.bytes().await.map_err(read_error)?;
                FetchedContent::GenericFile {
                    mime_type: content_type,
                    preview: file_preview(&bytes),
                }
            }
            ContentKind::Html => FetchedContent::Html {
                body: response.text().await.map_err(read_error)?,
            },
        };

        Ok(FetchEnvelope {
            url: final_url,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_classify() {
        assert_eq!(classify_content_type("image/png"), ContentKind::Image);
        assert_eq!(classify_content_type("application/pdf"), ContentKind::Pdf);
        assert_eq!(
            classify_content_type("text/html; charset=utf-8"),
            ContentKind::Html
        );
        assert_eq!(classify_content_type(""), ContentKind::Html);
        assert_eq!(
            classify_content_type("application/json"),
            ContentKind::GenericFile
        );
        assert_eq!(classify_content_type("text/csv"), ContentKind::GenericFile);
    }

    #[test]
    fn preview_is_capped_and_text_only() {
        let long = "x".repeat(2000);
        assert_eq!(file_preview(long.as_bytes()).unwrap().len(), FILE_PREVIEW_CHARS);
        assert_eq!(file_preview(&[0xff, 0xfe, 0x00]), None);
    }
}
