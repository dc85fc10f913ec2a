//! Extraction of the postings table from the README markdown.
//!
//! The README is free-form markdown with a single pipe table whose header is
//! [`TABLE_HEADER`]. Rows are tokenized on `|` and mapped positionally onto
//! [`RawTableRow`]; nothing here touches the network or the store.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::posting_date;

/// Header line that identifies the postings table.
pub const TABLE_HEADER: &str = "| Company | Role | Location | Application/Link | Date Posted |";

/// Company column marker for "another posting from the company above".
pub const CONTINUATION_MARKER: &str = "↳";

const MIN_NON_EMPTY_CELLS: usize = 4;

static HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="([^"]+)""#).expect("href pattern is valid"));

/// One data line of the postings table, cleaned but not yet interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTableRow {
    /// Company column with bold markers removed; may still be a `[name](url)` link.
    pub company_cell: String,
    pub role: String,
    pub location: String,
    /// Anchor target of the application column, or the column verbatim.
    pub application_cell: String,
    /// Short label such as `"Dec 15"`; empty when the column is missing.
    pub date_posted: String,
}

/// Parses the table and keeps the rows posted on `reference_date`.
///
/// Returns `None` when the document has no postings table.
pub fn extract(markdown: &str, reference_date: NaiveDate) -> Option<Vec<RawTableRow>> {
    parse_table(markdown).map(|rows| posted_on(rows, reference_date))
}

/// Parses every data row of the table, in table order.
pub fn parse_table(markdown: &str) -> Option<Vec<RawTableRow>> {
    let body = locate_table(markdown)?;

    let mut rows: Vec<RawTableRow> = Vec::with_capacity(body.len());
    for line in body {
        let line = line.trim();
        if line.is_empty() || line.starts_with("|-") {
            continue;
        }
        let Some(mut row) = parse_row(line) else {
            continue;
        };
        if row.company_cell == CONTINUATION_MARKER {
            if let Some(previous) = rows.last() {
                row.company_cell = previous.company_cell.clone();
            }
        }
        rows.push(row);
    }

    Some(rows)
}

/// Keeps rows whose Date Posted label names `reference_date`, preserving order.
pub fn posted_on(rows: Vec<RawTableRow>, reference_date: NaiveDate) -> Vec<RawTableRow> {
    rows.into_iter()
        .filter(|row| posting_date::is_posted_on(&row.date_posted, reference_date))
        .collect()
}

/// Returns the `href` target of the first HTML anchor in `cell`, or `cell` itself.
pub fn extract_href(cell: &str) -> &str {
    HREF_RE
        .captures(cell)
        .and_then(|caps| caps.get(1))
        .map_or(cell, |m| m.as_str())
}

/// Lines after the header that belong to the table. The table must have at least
/// one line after its header.
fn locate_table(markdown: &str) -> Option<Vec<&str>> {
    let mut lines = markdown.lines();
    lines.by_ref().find(|line| line.trim() == TABLE_HEADER)?;

    let body: Vec<&str> = lines.take_while(|line| line.starts_with('|')).collect();
    if body.is_empty() {
        return None;
    }
    Some(body)
}

fn parse_row(line: &str) -> Option<RawTableRow> {
    let cells = split_cells(line);

    let non_empty = cells.iter().filter(|cell| !cell.is_empty()).count();
    if non_empty < MIN_NON_EMPTY_CELLS {
        return None;
    }
    if cells.iter().all(|cell| is_separator_cell(cell)) {
        return None;
    }

    let cell = |index: usize| cells.get(index).copied().unwrap_or_default();
    Some(RawTableRow {
        company_cell: cell(0).replace('*', "").trim().to_string(),
        role: cell(1).to_string(),
        location: cell(2).to_string(),
        application_cell: extract_href(cell(3)).to_string(),
        date_posted: cell(4).to_string(),
    })
}

/// Splits on `|` and trims. The empty segments left by the outer delimiters are
/// dropped; interior cells keep their position even when empty.
fn split_cells(line: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    if cells.first().is_some_and(|cell| cell.is_empty()) {
        cells.remove(0);
    }
    cells
}

fn is_separator_cell(cell: &str) -> bool {
    cell.chars().all(|c| c == '-' || c == ':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_cells_drops_outer_segments_only() {
        assert_eq!(split_cells("| a | b | c |"), vec!["a", "b", "c"]);
        assert_eq!(split_cells("| a |  | c |"), vec!["a", "", "c"]);
        assert_eq!(split_cells("a | b"), vec!["a", "b"]);
    }

    #[test]
    fn test_separator_cells() {
        assert!(is_separator_cell("---"));
        assert!(is_separator_cell(":---:"));
        assert!(!is_separator_cell("-a-"));
    }

    #[test]
    fn test_parse_row_requires_four_cells() {
        assert!(parse_row("| Acme | SWE | Remote |").is_none());
        assert!(parse_row("| Acme | SWE |  | link |").is_none());
        assert!(parse_row("| Acme | SWE |  | link | Dec 15 |").is_some());
        assert!(parse_row("| Acme | SWE | Remote | link |").is_some());
    }

    #[test]
    fn test_parse_row_rejects_dash_rows() {
        assert!(parse_row("| --- | --- | --- | --- | --- |").is_none());
        assert!(parse_row("| :--- | :---: | ---: | --- | --- |").is_none());
    }

    #[test]
    fn test_parse_row_without_date_column() {
        let row = parse_row("| Acme | SWE | Remote | https://acme.example/apply |").unwrap();
        assert_eq!(row.date_posted, "");
        assert_eq!(row.application_cell, "https://acme.example/apply");
    }

    #[test]
    fn test_extract_href_takes_first_anchor() {
        let cell = concat!(
            r#"<a href="https://apply.example/x"><img src="apply.png"></a> "#,
            r#"<a href="https://simplify.jobs/p/1"><img src="s.png"></a>"#,
        );
        assert_eq!(extract_href(cell), "https://apply.example/x");
        assert_eq!(extract_href("🔒"), "🔒");
    }

    #[test]
    fn test_locate_table_needs_a_body() {
        let markdown = format!("intro\n{}\n\nafter", TABLE_HEADER);
        assert!(locate_table(&markdown).is_none());
    }
}
