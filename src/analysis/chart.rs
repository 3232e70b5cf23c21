//! Textual bar charts for extracted tables.

use crate::types::Table;

pub const DEFAULT_MAX_BARS: usize = 10;
pub const DEFAULT_MAX_WIDTH: usize = 30;
/// Upper bounds applied to caller-supplied `max_bars` and `max_width`.
pub const MAX_CHART_BARS: usize = 50;
pub const MAX_CHART_WIDTH: usize = 200;
const BAR_CHAR: char = '█';

static_regex!(column_phrase_re, r"(?i)(?:of|for)\s+([\w\s]+)");
static_regex!(chart_request_re, r"(?i)chart|visualize|plot|bar chart|graph");
static_regex!(
    leading_float_re,
    r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?"
);

/// Parse the longest numeric prefix of `text`, ignoring `$`, `,` and `%`.
///
/// `"$1,200.50 USD"` is `1200.5`; `"n/a"` is `None`.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| !matches!(c, '$' | ',' | '%')).collect();
    leading_float_re()
        .find(&cleaned)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
}

/// Column to chart for `user_intent`.
///
/// A phrase after "of"/"for" in the intent is matched case-insensitively as a
/// substring of the headers. Otherwise the first header with any numeric cell
/// wins.
pub fn suggest_column(table: &Table, user_intent: &str) -> Option<String> {
    let guess = column_phrase_re()
        .captures(user_intent)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_lowercase())
        .filter(|g| !g.is_empty());

    if let Some(guess) = guess {
        if let Some(header) = table
            .headers
            .iter()
            .find(|h| h.to_lowercase().contains(&guess))
        {
            return Some(header.clone());
        }
    }

    table
        .headers
        .iter()
        .find(|header| {
            table.rows.iter().any(|row| {
                row.get(header.as_str())
                    .and_then(|cell| parse_leading_float(cell))
                    .is_some()
            })
        })
        .cloned()
}

/// One `"<value> | <bar>"` line per numeric cell of `column`, largest first.
///
/// The largest value gets `max_width` bar characters. `max_bars` and
/// `max_width` are capped at [`MAX_CHART_BARS`] and [`MAX_CHART_WIDTH`].
/// `None` when the column is unknown, holds no numbers, or its largest value
/// is zero.
pub fn render_bar_chart(
    table: &Table,
    column: &str,
    max_bars: usize,
    max_width: usize,
) -> Option<String> {
    if !table.headers.iter().any(|h| h == column) {
        return None;
    }
    let max_bars = max_bars.min(MAX_CHART_BARS);
    let max_width = max_width.min(MAX_CHART_WIDTH);

    let mut values: Vec<f64> = table
        .rows
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|cell| !cell.is_empty())
        .filter_map(|cell| parse_leading_float(cell))
        .collect();
    if values.is_empty() {
        return None;
    }

    values.sort_by(|a, b| b.total_cmp(a));
    values.truncate(max_bars);

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == 0.0 {
        return None;
    }

    let lines: Vec<String> = values
        .iter()
        .map(|v| {
            let width = ((v / max) * max_width as f64)
                .round()
                .clamp(0.0, max_width as f64) as usize;
            format!("{} | {}", v, BAR_CHAR.to_string().repeat(width))
        })
        .collect();
    Some(lines.join("\n"))
}

/// True when the intent asks for a chart, plot, graph or visualization.
pub fn wants_chart(user_intent: &str) -> bool {
    chart_request_re().is_match(user_intent)
}

/// Chart the first table when the intent asks for one.
pub fn chart_for_intent(tables: &[Table], user_intent: &str) -> Option<String> {
    if !wants_chart(user_intent) {
        return None;
    }
    let table = tables.first()?;
    let column = suggest_column(table, user_intent)?;
    render_bar_chart(table, &column, DEFAULT_MAX_BARS, DEFAULT_MAX_WIDTH)
}
