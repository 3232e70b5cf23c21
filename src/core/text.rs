//! Small string helpers shared by the extractor, crawler and chart code.
//! All length limits count `char`s, never bytes.

static_regex!(tag_re, r"<[^>]+>");
static_regex!(whitespace_re, r"\s+");

/// Remove every `<...>` tag, substituting `replacement`.
pub fn strip_tags(html: &str, replacement: &str) -> String {
    tag_re().replace_all(html, replacement).into_owned()
}

/// Collapse whitespace runs to a single space. Does not trim.
pub fn collapse_whitespace(text: &str) -> String {
    whitespace_re().replace_all(text, " ").into_owned()
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// First `max_chars` characters, with `...` appended when anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn preview_marks_cut_text() {
        assert_eq!(preview("ñandú", 3), "ñan...");
        assert_eq!(preview("short", 5), "short");
        assert_eq!(preview("", 5), "");
    }

    #[test]
    fn strip_and_collapse() {
        let s = strip_tags("<p>Hello <b>big</b>\n\n world</p>", " ");
        assert_eq!(collapse_whitespace(&s).trim(), "Hello big world");
    }
}
