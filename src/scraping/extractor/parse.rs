use super::{HtmlExtractor, MAX_ARTICLE_LINKS, MAX_HEADINGS, MAX_NAV_HREF_LEN, MAX_NAV_LINKS};
use crate::core::text::strip_tags;
use crate::types::{Heading, NavLink};
use regex::Regex;
use std::collections::HashSet;
use url::Url;

static_regex!(heading_open_re, r"(?i)<h([1-3])[^>]*>");
// One pattern per level: the closing tag must match the opening level.
static_regex!(h1_re, r"(?i)<h1[^>]*>(.*?)</h1>");
static_regex!(h2_re, r"(?i)<h2[^>]*>(.*?)</h2>");
static_regex!(h3_re, r"(?i)<h3[^>]*>(.*?)</h3>");

// Hrefs containing `#` or `?` never match and are skipped.
static_regex!(nav_link_re, r#"(?i)<a[^>]+href=["']([^"'#?]+)["'][^>]*>(.*?)</a>"#);
static_regex!(any_link_re, r#"(?i)<a[^>]+href=["']([^"']+)["'][^>]*>(.*?)</a>"#);
static_regex!(
    article_href_re,
    r"(?i)(/article|/news|/blog|/post|/story|[\d-]+\.html?$)"
);

impl HtmlExtractor {
    /// `<h1>`–`<h3>` in document order, tag-stripped, capped.
    ///
    /// One left-to-right scan: each opening tag takes the text up to the first
    /// closing tag of the same level on that line, and scanning resumes after
    /// it. An opening tag without a close is skipped.
    pub(super) fn extract_headings(&self, html: &str) -> Vec<Heading> {
        let mut headings = Vec::new();
        let mut pos = 0;
        while headings.len() < MAX_HEADINGS {
            let Some(open) = heading_open_re().captures_at(html, pos) else {
                break;
            };
            let (Some(tag), Some(level)) = (open.get(0), open.get(1)) else {
                break;
            };
            let (level, re): (u8, &Regex) = match level.as_str() {
                "1" => (1, h1_re()),
                "2" => (2, h2_re()),
                _ => (3, h3_re()),
            };

            let closed = re
                .captures_at(html, tag.start())
                .and_then(|caps| Some((caps.get(0)?, caps.get(1)?)))
                .filter(|(whole, _)| whole.start() == tag.start());
            match closed {
                Some((whole, inner)) => {
                    headings.push(Heading {
                        level,
                        text: strip_tags(inner.as_str(), "").trim().to_string(),
                    });
                    pos = whole.end();
                }
                // `<` is one byte, so this stays on a char boundary.
                None => pos = tag.start() + 1,
            }
        }
        headings
    }

    /// Absolute https links with visible text, deduplicated by href.
    pub(super) fn extract_nav_links(&self, html: &str, base: Option<&Url>) -> Vec<NavLink> {
        let Some(base) = base else {
            return Vec::new();
        };

        let mut links = Vec::new();
        let mut seen = HashSet::new();
        for caps in nav_link_re().captures_iter(html) {
            let (Some(href), Some(text)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let Ok(absolute) = base.join(href.as_str()) else {
                continue;
            };
            let href = absolute.to_string();
            let text = strip_tags(text.as_str(), "").trim().to_string();

            if text.is_empty() || href.len() >= MAX_NAV_HREF_LEN || !href.starts_with("https") {
                continue;
            }
            if !seen.insert(href.clone()) {
                continue;
            }
            links.push(NavLink { href, text });
            if links.len() >= MAX_NAV_LINKS {
                break;
            }
        }
        links
    }

    /// Links whose target looks like an article, story or post.
    pub(super) fn extract_article_links(&self, html: &str, base: Option<&Url>) -> Vec<NavLink> {
        let Some(base) = base else {
            return Vec::new();
        };

        let mut links = Vec::new();
        let mut seen = HashSet::new();
        for caps in any_link_re().captures_iter(html) {
            let (Some(href), Some(text)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let Ok(absolute) = base.join(href.as_str()) else {
                continue;
            };
            let href = absolute.to_string();
            let text = strip_tags(text.as_str(), "").trim().to_string();

            if text.is_empty() || !href.starts_with("http") || !article_href_re().is_match(&href) {
                continue;
            }
            if !seen.insert(href.clone()) {
                continue;
            }
            links.push(NavLink { href, text });
            if links.len() >= MAX_ARTICLE_LINKS {
                break;
            }
        }
        links
    }
}
