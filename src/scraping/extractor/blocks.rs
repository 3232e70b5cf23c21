use super::{HtmlExtractor, MAX_FAQ_CHARS, MAX_NEWS_CHARS, MAX_PRODUCT_CARDS};
use crate::core::text::{collapse_whitespace, strip_tags, truncate_chars};
use crate::types::ProductCard;

// A card block ends at the first `</div>`, nested or not.
static_regex!(
    product_block_re,
    r#"(?i)<div[^>]*class=["'][^"']*(product|card|item|listing)[^"']*["'][^>]*>([\s\S]*?)(</div>)"#
);
static_regex!(card_name_re, r"(?i)<h[1-4][^>]*>(.*?)</h[1-4]>");
static_regex!(card_price_re, r"\$[0-9,.]+");
static_regex!(card_feature_re, r"(?i)<li[^>]*>(.*?)</li>");
static_regex!(card_image_re, r#"(?i)<img[^>]+src=["']([^"']+)["']"#);

static_regex!(details_re, r"(?i)<details[\s\S]*?</details>");
static_regex!(
    news_section_re,
    r"(?i)<(section|div)[^>]+(news|blog|update)[^>]*>[\s\S]*?</(section|div)>"
);

/// Tag-strip to spaces, collapse whitespace, trim, cap.
fn flatten_block(block: &str, max_chars: usize) -> String {
    let text = collapse_whitespace(&strip_tags(block, " "));
    truncate_chars(text.trim(), max_chars)
}

impl HtmlExtractor {
    pub(super) fn extract_product_cards(&self, html: &str) -> Vec<ProductCard> {
        product_block_re()
            .captures_iter(html)
            .filter_map(|caps| caps.get(2).map(|m| m.as_str()))
            .map(|block| ProductCard {
                name: card_name_re()
                    .captures(block)
                    .and_then(|c| c.get(1))
                    .map(|m| strip_tags(m.as_str(), "").trim().to_string())
                    .unwrap_or_default(),
                price: card_price_re()
                    .find(block)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                features: card_feature_re()
                    .captures_iter(block)
                    .filter_map(|c| c.get(1))
                    .map(|m| strip_tags(m.as_str(), "").trim().to_string())
                    .collect(),
                image_url: card_image_re()
                    .captures(block)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            })
            .filter(|card| !card.name.is_empty() || !card.price.is_empty() || !card.features.is_empty())
            .take(MAX_PRODUCT_CARDS)
            .collect()
    }

    /// Every `<details>` block, flattened.
    pub(super) fn extract_faqs(&self, html: &str) -> Vec<String> {
        details_re()
            .find_iter(html)
            .map(|m| flatten_block(m.as_str(), MAX_FAQ_CHARS))
            .collect()
    }

    /// `<section>`/`<div>` blocks whose attributes mention news, blog or update.
    pub(super) fn extract_news_sections(&self, html: &str) -> Vec<String> {
        news_section_re()
            .find_iter(html)
            .map(|m| flatten_block(m.as_str(), MAX_NEWS_CHARS))
            .collect()
    }
}
