//! Helpers that turn a free-text chat message into analysis parameters.

use crate::types::{NavLink, PartialRetryParams, RetryParams};

static_regex!(full_url_re, r"(?i)(https?://[\w\-.]+(:\d+)?(/[\w\-./?#=&%]*)?)");
static_regex!(bare_domain_re, r"(?i)\b([\w-]+\.)+[a-z]{2,}(/[\w\-./?#=&%]*)?");
static_regex!(domain_only_re, r"(?i)^([\w-]+\.)+[a-z]{2,}(/.*)?$");
static_regex!(scheme_re, r"(?i)^https?://");

static_regex!(depth_override_re, r"(?i)recursion(depth)?\s*[:=]?\s*(\d+)");
static_regex!(pages_override_re, r"(?i)max(pages)?\s*[:=]?\s*(\d+)");
static_regex!(timeout_override_re, r"(?i)timeout(ms)?\s*[:=]?\s*(\d+)");

static_regex!(news_url_re, r"(?i)news|blog|hn\.ycombinator|reddit|forum|discussion");
static_regex!(shop_url_re, r"(?i)amazon|ebay|walmart|shop|store|product|cart");
static_regex!(video_url_re, r"(?i)youtube|video|playlist");
static_regex!(docs_url_re, r"(?i)docs|faq|help|support");
static_regex!(data_intent_re, r"(?i)table|data|csv|spreadsheet");

static_regex!(
    deeper_re,
    r"(?i)go deeper|deeper|more depth|try again|fetch more|get more|not enough|incomplete|missing|insufficient"
);

/// Prefix `https://` onto something that looks like a bare domain.
pub fn autocomplete_url(text: &str) -> String {
    if scheme_re().is_match(text) {
        return text.to_string();
    }
    let trimmed = text.trim();
    if domain_only_re().is_match(trimmed) {
        return format!("https://{}", trimmed);
    }
    text.to_string()
}

/// First `http(s)://` URL in `text`, else the first bare domain made absolute.
pub fn extract_url(text: &str) -> Option<String> {
    if let Some(m) = full_url_re().captures(text).and_then(|c| c.get(1)) {
        return Some(m.as_str().to_string());
    }
    bare_domain_re()
        .find(text)
        .map(|m| autocomplete_url(m.as_str()))
}

fn capture_number<T: std::str::FromStr>(re: &regex::Regex, text: &str) -> Option<T> {
    re.captures(text)
        .and_then(|c| c.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

/// Inline overrides such as `recursionDepth: 3`, `maxPages=10`, `timeout 9000`.
pub fn extract_recursion_params(text: &str) -> PartialRetryParams {
    PartialRetryParams {
        recursion_depth: capture_number(depth_override_re(), text),
        max_pages: capture_number(pages_override_re(), text),
        timeout_ms: capture_number(timeout_override_re(), text),
    }
}

/// Starting params picked from the kind of site and what the user wants.
pub fn smart_defaults(url: &str, user_intent: &str) -> RetryParams {
    let (recursion_depth, max_pages, timeout_ms) = if news_url_re().is_match(url) {
        (2, 8, 12_000)
    } else if shop_url_re().is_match(url) {
        (1, 5, 10_000)
    } else if video_url_re().is_match(url) {
        (1, 3, 9_000)
    } else if docs_url_re().is_match(url) {
        (1, 4, 9_000)
    } else if data_intent_re().is_match(user_intent) {
        (0, 2, 8_000)
    } else {
        (1, 5, 10_000)
    };
    RetryParams {
        recursion_depth,
        max_pages,
        timeout_ms,
    }
}

/// Explicit values win field by field over the smart defaults.
pub fn resolve_params(url: &str, user_intent: &str, explicit: PartialRetryParams) -> RetryParams {
    let defaults = smart_defaults(url, user_intent);
    RetryParams {
        recursion_depth: explicit.recursion_depth.unwrap_or(defaults.recursion_depth),
        max_pages: explicit.max_pages.unwrap_or(defaults.max_pages),
        timeout_ms: explicit.timeout_ms.unwrap_or(defaults.timeout_ms),
    }
}

/// The user is asking for another, deeper look.
pub fn wants_deeper(text: &str) -> bool {
    deeper_re().is_match(text)
}

/// Nav links whose text shares a word (longer than three characters) with the
/// intent, or contains the whole intent. Empty for "analyze" requests.
pub fn suggest_links(nav_links: &[NavLink], user_intent: &str) -> Vec<NavLink> {
    let intent = user_intent.to_lowercase();
    if intent.is_empty() || intent.contains("analyze") {
        return Vec::new();
    }
    let words: Vec<&str> = intent.split(' ').filter(|w| w.chars().count() > 3).collect();

    nav_links
        .iter()
        .filter(|link| {
            let text = link.text.to_lowercase();
            words.iter().any(|w| text.contains(w)) || text.contains(&intent)
        })
        .cloned()
        .collect()
}
