// src/process/layout.rs
//
// The extractor names columns by whatever it finds in the header line, so the
// same report has been seen with several column sets over time. Everything
// that guesses column identity from names and counts lives here.

use crate::process::raw_table::RawTable;
use crate::process::NormalizeError;
use crate::report::{ReportType, TOTAL_CASES};

/// Name given to the label column of confirmed-case tables.
pub const LABEL_COLUMN: &str = ".";

pub const DEATHS_COLUMNS: [&str; 4] = [
    "Underlying Conditions",
    "No Underlying Conditions",
    "Pending",
    "Total",
];

pub const HOSPITALIZATION_COLUMNS: [&str; 2] = ["hospitalized", "confirmed"];

/// Known table shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Confirmed cases, 3 or 6 columns; only `label` and `total` are kept.
    ConfirmedWide { label: usize, total: usize },
    /// Confirmed cases already laid out as (label, total).
    ConfirmedPair,
    Deaths,
    Hospitalizations,
}

/// Pick the table that carries the counts.
pub fn select_table(tables: &[RawTable], report: ReportType) -> Result<&RawTable, NormalizeError> {
    if tables.is_empty() {
        return Err(NormalizeError::NoTables(report));
    }
    match report {
        ReportType::Confirmed if tables.len() == 3 => Ok(&tables[1]),
        _ => Ok(&tables[0]),
    }
}

pub fn classify(table: &RawTable, report: ReportType) -> Result<Layout, NormalizeError> {
    let unsupported = || NormalizeError::UnsupportedLayout {
        report,
        columns: table.headers.clone(),
    };
    let width = table.headers.len();

    match report {
        ReportType::Confirmed => match width {
            3 | 6 => {
                let (label, total) = match table.column_index(TOTAL_CASES) {
                    Some(total) => (table.column_index(LABEL_COLUMN), Some(total)),
                    None => (
                        table
                            .column_index(LABEL_COLUMN)
                            .or_else(|| table.column_index(&RawTable::unnamed(0))),
                        table
                            .column_index(&RawTable::unnamed(2))
                            .or_else(|| table.column_index(&RawTable::unnamed(1))),
                    ),
                };
                match (label, total) {
                    (Some(label), Some(total)) if label != total => {
                        Ok(Layout::ConfirmedWide { label, total })
                    }
                    _ => Err(unsupported()),
                }
            }
            2 => Ok(Layout::ConfirmedPair),
            _ => Err(unsupported()),
        },
        ReportType::Deaths if has_unlabeled_values(table, DEATHS_COLUMNS.len()) => {
            Ok(Layout::Deaths)
        }
        ReportType::Hospitalizations
            if has_unlabeled_values(table, HOSPITALIZATION_COLUMNS.len()) =>
        {
            Ok(Layout::Hospitalizations)
        }
        _ => Err(unsupported()),
    }
}

/// A label column followed by exactly `count` value columns, each named
/// `Unnamed: <i>` for `i` in `0..count`.
fn has_unlabeled_values(table: &RawTable, count: usize) -> bool {
    table.headers.len() == count + 1
        && (0..count).all(|i| {
            matches!(table.column_index(&RawTable::unnamed(i)), Some(pos) if pos > 0)
        })
}

/// Rename and restrict columns so the label is first and the value columns
/// carry their canonical names.
pub fn shape(table: &RawTable, layout: Layout) -> RawTable {
    match layout {
        Layout::ConfirmedWide { label, total } => {
            let mut out = table.select(&[label, total]);
            out.headers = vec![LABEL_COLUMN.to_string(), TOTAL_CASES.to_string()];
            out.drop_empty_rows();
            out
        }
        Layout::ConfirmedPair => {
            let mut out = table.clone();
            out.headers = vec![LABEL_COLUMN.to_string(), TOTAL_CASES.to_string()];
            out
        }
        Layout::Deaths => renamed_positionally(table, &DEATHS_COLUMNS),
        Layout::Hospitalizations => renamed_positionally(table, &HOSPITALIZATION_COLUMNS),
    }
}

fn renamed_positionally(table: &RawTable, names: &[&str]) -> RawTable {
    let mut out = table.clone();
    for (i, name) in names.iter().enumerate() {
        out.rename(&RawTable::unnamed(i), name);
    }
    out
}
