use super::HtmlExtractor;
use regex::Regex;
use whatlang::detect;

static_regex!(
    meta_description_re,
    r#"(?i)<meta[^>]+name=["']description["'][^>]+content=["']([^"']+)["'][^>]*>"#
);
static_regex!(
    og_title_re,
    r#"(?i)<meta[^>]+property=["']og:title["'][^>]+content=["']([^"']+)["'][^>]*>"#
);
static_regex!(
    og_description_re,
    r#"(?i)<meta[^>]+property=["']og:description["'][^>]+content=["']([^"']+)["'][^>]*>"#
);

/// Main text shorter than this is not worth a language guess.
const MIN_LANGUAGE_SAMPLE_CHARS: usize = 20;

fn first_capture(re: &Regex, html: &str) -> String {
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

impl HtmlExtractor {
    /// `<meta name="description">`, empty when absent
    pub(super) fn extract_meta_description(&self, html: &str) -> String {
        first_capture(meta_description_re(), html)
    }

    pub(super) fn extract_og_title(&self, html: &str) -> String {
        first_capture(og_title_re(), html)
    }

    pub(super) fn extract_og_description(&self, html: &str) -> String {
        first_capture(og_description_re(), html)
    }

    /// ISO 639-3 code of the main text, `und` when too short or undetectable.
    pub(super) fn detect_language(&self, main_text: &str) -> String {
        if main_text.chars().count() <= MIN_LANGUAGE_SAMPLE_CHARS {
            return "und".to_string();
        }
        detect(main_text)
            .map(|info| info.lang().code().to_string())
            .unwrap_or_else(|| "und".to_string())
    }
}
