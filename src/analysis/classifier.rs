use crate::types::{PageExtract, SiteType};

/// More than this many product cards makes a page a shop.
const ECOMMERCE_MIN_CARDS: usize = 2;

/// Ordered rules, first match wins.
pub fn classify(extract: &PageExtract) -> SiteType {
    if extract.product_cards.len() > ECOMMERCE_MIN_CARDS {
        SiteType::ECommerce
    } else if !extract.news_sections.is_empty() || extract.mentions_news {
        SiteType::NewsBlog
    } else if !extract.faqs.is_empty() {
        SiteType::DocsFaq
    } else if !extract.tables.is_empty() {
        SiteType::DataTable
    } else {
        SiteType::General
    }
}
