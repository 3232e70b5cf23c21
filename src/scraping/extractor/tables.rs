use super::{MAX_TABLES, MAX_TABLE_ROWS};
use crate::core::text::strip_tags;
use crate::types::Table;
use regex::Regex;
use std::collections::BTreeMap;

// Lazy body: a nested table ends the outer match at the inner `</table>`.
static_regex!(table_re, r"(?is)<table[\s\S]*?>(.*?)</table>");
static_regex!(th_re, r"(?i)<th[^>]*>([\s\S]*?)</th>");
static_regex!(tr_re, r"(?i)<tr[^>]*>([\s\S]*?)</tr>");
static_regex!(header_cell_re, r"(?i)<(?:td|th)[^>]*>([\s\S]*?)</(?:td|th)>");
static_regex!(td_re, r"(?i)<td[^>]*>([\s\S]*?)</td>");
static_regex!(thead_re, r"(?i)<thead");

fn cell_texts(re: &Regex, html: &str) -> Vec<String> {
    re.captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| strip_tags(m.as_str(), "").trim().to_string())
        .collect()
}

fn synthetic_column(index: usize) -> String {
    format!("Column {}", index + 1)
}

/// Headers from `<th>` cells, else from every cell of the first row.
fn table_headers(body: &str) -> Vec<String> {
    let headers = cell_texts(th_re(), body);
    if !headers.is_empty() {
        return headers;
    }
    tr_re()
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|first_row| cell_texts(header_cell_re(), first_row.as_str()))
        .unwrap_or_default()
}

fn parse_table(body: &str) -> Option<Table> {
    let headers = table_headers(body);

    // Without a <thead>, the first row is assumed to be the header row.
    let skip_first_row = !headers.is_empty() && !thead_re().is_match(body);

    let rows: Vec<Vec<String>> = tr_re()
        .captures_iter(body)
        .skip(usize::from(skip_first_row))
        .filter_map(|c| c.get(1))
        .map(|row| cell_texts(td_re(), row.as_str()))
        .filter(|cells| !cells.is_empty() && (headers.is_empty() || cells.len() == headers.len()))
        .take(MAX_TABLE_ROWS)
        .collect();

    if rows.is_empty() {
        return None;
    }

    if headers.is_empty() {
        let rows: Vec<BTreeMap<String, String>> = rows
            .into_iter()
            .map(|cells| {
                cells
                    .into_iter()
                    .enumerate()
                    .map(|(i, cell)| (synthetic_column(i), cell))
                    .collect()
            })
            .collect();
        let headers = rows
            .first()
            .map(|row| (0..row.len()).map(synthetic_column).collect())
            .unwrap_or_default();
        return Some(Table { headers, rows });
    }

    let rows = rows
        .into_iter()
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let key = if header.is_empty() {
                        synthetic_column(i)
                    } else {
                        header.clone()
                    };
                    (key, cells.get(i).cloned().unwrap_or_default())
                })
                .collect()
        })
        .collect();
    Some(Table { headers, rows })
}

/// Every `<table>` with at least one data row, capped.
///
/// Rows must have exactly as many `<td>` cells as there are headers. When no
/// headers can be found, any non-empty row is kept under `Column N` keys.
pub fn parse_html_tables(html: &str) -> Vec<Table> {
    table_re()
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .filter_map(|body| parse_table(body.as_str()))
        .take(MAX_TABLES)
        .collect()
}
