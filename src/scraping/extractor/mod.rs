//! Regex-based HTML extraction.
//!
//! Matching is done with regular expressions over the raw markup, not a DOM.
//! Malformed or nested markup (tables inside tables, cards containing `</div>`
//! before their content ends) degrades to partial or skipped fields instead of
//! erroring. The results below are the pinned behaviour; see the tests.

mod blocks;
mod metadata;
mod parse;
mod summary;
mod tables;

use crate::analysis::classifier;
use crate::types::PageExtract;
use url::Url;

pub use tables::parse_html_tables;

pub const MAX_HEADINGS: usize = 10;
pub const MAX_NAV_LINKS: usize = 20;
pub const MAX_NAV_HREF_LEN: usize = 256;
pub const MAX_ARTICLE_LINKS: usize = 50;
pub const MAX_PRODUCT_CARDS: usize = 10;
pub const MAX_FAQ_CHARS: usize = 200;
pub const MAX_NEWS_CHARS: usize = 400;
pub const MAX_TABLES: usize = 5;
pub const MAX_TABLE_ROWS: usize = 50;
pub const MAX_SUMMARY_CHARS: usize = 1500;
pub const SUMMARY_MAIN_TEXT_CHARS: usize = 500;

static_regex!(news_mention_re, r"(?i)news|blog|article");

/// Turns one HTML document into a [`PageExtract`]. Stateless and pure.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, html: &str, source_url: &str) -> PageExtract {
        let base = Url::parse(source_url).ok();

        let meta_description = self.extract_meta_description(html);
        let og_title = self.extract_og_title(html);
        let og_description = self.extract_og_description(html);
        let headings = self.extract_headings(html);
        let nav_links = self.extract_nav_links(html, base.as_ref());
        let article_links = self.extract_article_links(html, base.as_ref());
        let product_cards = self.extract_product_cards(html);
        let faqs = self.extract_faqs(html);
        let news_sections = self.extract_news_sections(html);
        let tables = parse_html_tables(html);
        let main_text = self.extract_main_text(html);
        let language = self.detect_language(&main_text);

        let title = if !og_title.is_empty() {
            og_title.clone()
        } else if let Some(first) = headings.first() {
            first.text.clone()
        } else {
            source_url.to_string()
        };

        let summary = self.build_summary(
            &og_title,
            &meta_description,
            &og_description,
            &headings,
            &tables,
            &product_cards,
            &faqs,
            &news_sections,
            &main_text,
        );

        let draft = PageExtract {
            url: source_url.to_string(),
            site_type: Default::default(),
            title,
            meta_description,
            og_title,
            og_description,
            headings,
            nav_links,
            product_cards,
            faqs,
            news_sections,
            tables,
            main_text,
            summary,
            language,
            article_links,
            mentions_news: news_mention_re().is_match(html),
        };

        PageExtract {
            site_type: classifier::classify(&draft),
            ..draft
        }
    }
}
