use super::{HtmlExtractor, MAX_SUMMARY_CHARS, SUMMARY_MAIN_TEXT_CHARS};
use crate::core::text::{collapse_whitespace, strip_tags, truncate_chars};
use crate::types::{Heading, ProductCard, Table};

static_regex!(script_re, r"(?i)<script[\s\S]*?</script>");
static_regex!(style_re, r"(?i)<style[\s\S]*?</style>");
static_regex!(head_re, r"(?i)<head[\s\S]*?</head>");

const SUMMARY_SEPARATOR: &str = " | ";

impl HtmlExtractor {
    /// Visible text of the document with scripts, styles and `<head>` removed.
    pub(super) fn extract_main_text(&self, html: &str) -> String {
        let text = script_re().replace_all(html, "");
        let text = style_re().replace_all(&text, "");
        let text = head_re().replace_all(&text, "");
        collapse_whitespace(&strip_tags(&text, " ")).trim().to_string()
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn build_summary(
        &self,
        og_title: &str,
        meta_description: &str,
        og_description: &str,
        headings: &[Heading],
        tables: &[Table],
        product_cards: &[ProductCard],
        faqs: &[String],
        news_sections: &[String],
        main_text: &str,
    ) -> String {
        let best_title = if og_title.is_empty() {
            headings.first().map(|h| h.text.clone()).unwrap_or_default()
        } else {
            og_title.to_string()
        };
        let best_description = if meta_description.is_empty() {
            og_description
        } else {
            meta_description
        };

        let mut parts: Vec<String> = vec![best_title, best_description.to_string()];
        parts.extend(headings.iter().skip(1).take(2).map(|h| h.text.clone()));
        if !tables.is_empty() {
            parts.push(format!("Contains {} data table(s).", tables.len()));
        }
        parts.extend(
            product_cards
                .iter()
                .take(2)
                .map(|c| format!("{} {}", c.name, c.price)),
        );
        parts.extend(faqs.iter().take(1).cloned());
        parts.extend(news_sections.iter().take(1).cloned());
        parts.push(truncate_chars(main_text, SUMMARY_MAIN_TEXT_CHARS));

        parts.retain(|p| !p.is_empty());
        let joined = collapse_whitespace(&parts.join(SUMMARY_SEPARATOR));
        truncate_chars(&joined, MAX_SUMMARY_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(text: &str) -> Heading {
        Heading {
            level: 2,
            text: text.to_string(),
        }
    }

    #[test]
    fn main_text_drops_invisible_blocks() {
        let html = "<html><head><title>T</title></head><body><script>var x = 1;</script><style>p{}</style><p>Hello</p>\n<p>world</p></body></html>";
        assert_eq!(HtmlExtractor::new().extract_main_text(html), "Hello world");
    }

    #[test]
    fn summary_pieces_in_order_and_empty_pieces_skipped() {
        let headings = vec![heading("Intro"), heading("Specs"), heading("Pricing"), heading("Extra")];
        let cards = vec![ProductCard {
            name: "Widget".to_string(),
            price: "$5".to_string(),
            ..Default::default()
        }];
        let tables = vec![Table::default()];
        let summary = HtmlExtractor::new().build_summary(
            "",
            "",
            "From OG",
            &headings,
            &tables,
            &cards,
            &["Q and A".to_string()],
            &[],
            "body text",
        );
        assert_eq!(
            summary,
            "Intro | From OG | Specs | Pricing | Contains 1 data table(s). | Widget $5 | Q and A | body text"
        );
    }

    #[test]
    fn summary_capped() {
        let long = "x".repeat(5000);
        let summary = HtmlExtractor::new().build_summary("T", "", "", &[], &[], &[], &[], &[long.clone()], &long);
        assert_eq!(summary.chars().count(), MAX_SUMMARY_CHARS);
    }
}
