//! Split text extracted from a PDF page into tables.
//!
//! The summaries lay their tables out as space-aligned columns, so a cell
//! boundary is a run of two or more whitespace characters. Tables are
//! separated by a form feed (page break) or by two or more blank lines.
//! The first line of a table is its header; unlabeled header positions are
//! named `Unnamed: <i>`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::process::{Cell, RawTable};

static CELL_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("gap regex is valid"));

/// Split one line into cell texts. An indented line starts with an empty cell.
fn split_cells(line: &str) -> Vec<String> {
    let trimmed_end = line.trim_end();
    let body = trimmed_end.trim_start();
    if body.is_empty() {
        return Vec::new();
    }
    let indent = trimmed_end.len() - body.len();

    let mut cells = Vec::new();
    if indent >= 2 {
        cells.push(String::new());
    }
    cells.extend(CELL_GAP.split(body).map(|c| c.to_string()));
    cells
}

fn blocks(text: &str) -> Vec<Vec<Vec<String>>> {
    let mut out = Vec::new();
    for page in text.split('\u{c}') {
        let mut current: Vec<Vec<String>> = Vec::new();
        let mut blank_run = 0;
        for line in page.lines() {
            let cells = split_cells(line);
            if cells.is_empty() {
                blank_run += 1;
                if blank_run >= 2 && !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                continue;
            }
            blank_run = 0;
            current.push(cells);
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}

fn to_table(block: Vec<Vec<String>>) -> Option<RawTable> {
    if !block.iter().any(|row| row.len() >= 2) {
        return None;
    }
    let width = block.iter().map(Vec::len).max().unwrap_or(0);
    let mut lines = block.into_iter();
    let header_cells = lines.next()?;

    let headers = (0..width)
        .map(|i| match header_cells.get(i).map(|h| h.trim()) {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => RawTable::unnamed(i),
        })
        .collect();
    let rows = lines
        .map(|cells| {
            let mut row: Vec<Cell> = cells.iter().map(|c| Cell::parse(c)).collect();
            row.resize(width, Cell::Empty);
            row
        })
        .collect();

    Some(RawTable::new(headers, rows))
}

/// Every table found in `text`, in document order.
pub fn extract_tables(text: &str) -> Vec<RawTable> {
    blocks(text).into_iter().filter_map(to_table).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_split_on_wide_gaps() {
        assert_eq!(split_cells("Age Group"), vec!["Age Group"]);
        assert_eq!(
            split_cells("18-44     1,000 (40%)"),
            vec!["18-44", "1,000 (40%)"]
        );
        assert_eq!(split_cells("      Total Cases"), vec!["", "Total Cases"]);
        assert!(split_cells("   ").is_empty());
    }

    #[test]
    fn header_line_names_columns() {
        let text = concat!(
            "              Total Cases\n",
            "Age Group\n",
            "18-44         1,000 (40%)\n",
            "45-64         800\n",
        );
        let tables = extract_tables(text);
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.headers, vec!["Unnamed: 0", "Total Cases"]);
        assert_eq!(t.rows.len(), 3);
        assert_eq!(t.rows[0], vec![Cell::Text("Age Group".into()), Cell::Empty]);
        assert_eq!(t.rows[2], vec![Cell::Text("45-64".into()), Cell::Int(800)]);
    }

    #[test]
    fn unlabeled_header_positions_are_numbered() {
        let text = "Borough\nBronx   10   20\n";
        let t = &extract_tables(text)[0];
        assert_eq!(t.headers, vec!["Borough", "Unnamed: 1", "Unnamed: 2"]);
        assert_eq!(t.rows.len(), 1);
    }

    #[test]
    fn blank_runs_and_page_breaks_separate_tables() {
        let text = "a  b\n1  2\n\n3  4\n\n\nc  d\n5  6\n\u{c}e  f\n7  8\n";
        let tables = extract_tables(text);
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[1].headers, vec!["c", "d"]);
        assert_eq!(tables[2].headers, vec!["e", "f"]);
    }

    #[test]
    fn prose_blocks_are_not_tables() {
        let text = "Data as of April 14\nSource: DOHMH\n\n\nx  y\n1  2\n";
        let tables = extract_tables(text);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["x", "y"]);
    }
}
