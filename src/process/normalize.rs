// src/process/normalize.rs

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::process::canonical::CanonicalTable;
use crate::process::cells::{clean_bucket, clean_count, parse_count};
use crate::process::layout::{classify, select_table, shape};
use crate::process::raw_table::{Cell, RawTable};
use crate::report::{labels::is_dropped_row, GroupLabel, ReportType, TOTAL_CASES, TOTAL_MARKER};

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("no tables extracted for {0} report")]
    NoTables(ReportType),
    #[error("unsupported {report} table layout with columns {columns:?}")]
    UnsupportedLayout {
        report: ReportType,
        columns: Vec<String>,
    },
    #[error("bad count {value:?} in column `{column}` for bucket `{bucket}` (cleaned to {cleaned:?})")]
    BadCount {
        column: String,
        bucket: String,
        value: String,
        cleaned: String,
    },
    #[error("{report} table with columns {columns:?} has no data rows")]
    NoRows {
        report: ReportType,
        columns: Vec<String>,
    },
}

/// Normalizer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub table: CanonicalTable,
    /// Grand total printed in the document, if it had one. Not persisted.
    pub reported_total: Option<i64>,
}

/// Turn the extracted tables of one document into a canonical table.
///
/// Rows are read top to bottom:
/// - a repeated `Total Cases` header is skipped,
/// - the `Total` row is kept aside as `reported_total`,
/// - a group label row switches the current group,
/// - rows in the drop set and rows with an empty label are discarded,
/// - everything else becomes a (group, bucket) entry.
///
/// A table that yields no entries at all is an error.
#[tracing::instrument(level = "debug", skip(tables), fields(tables = tables.len()))]
pub fn normalize(tables: &[RawTable], report: ReportType) -> Result<Normalized, NormalizeError> {
    let mut table = select_table(tables, report)?.clone();
    if report == ReportType::Confirmed {
        table.drop_empty_rows();
    }
    let layout = classify(&table, report)?;
    debug!(?layout, columns = ?table.headers, "classified table");
    let table = shape(&table, layout);

    let value_columns: Vec<String> = table.headers.iter().skip(1).cloned().collect();
    let mut out = CanonicalTable::new(value_columns.clone());
    let mut reported_total = None;
    let mut group: Option<GroupLabel> = None;

    for row in &table.rows {
        if row.last().and_then(Cell::as_text) == Some(TOTAL_CASES) {
            trace!("skipping repeated header row");
            continue;
        }
        let label_text: Cow<str> = match row.first() {
            Some(Cell::Text(s)) => Cow::Borrowed(s.as_str()),
            Some(Cell::Int(n)) => Cow::Owned(n.to_string()),
            _ => continue,
        };
        let label = label_text.as_ref();

        if label == TOTAL_MARKER {
            reported_total = row.get(1).and_then(lenient_count);
            continue;
        }
        if let Some(g) = GroupLabel::from_label(label) {
            group = Some(g);
            continue;
        }
        if is_dropped_row(label) {
            continue;
        }

        let bucket = clean_bucket(label);
        let mut values = Vec::with_capacity(value_columns.len());
        for (i, column) in value_columns.iter().enumerate() {
            let cell = row.get(i + 1).unwrap_or(&Cell::Empty);
            values.push(count_value(cell, column, &bucket)?);
        }
        out.push(group, bucket, values);
    }

    if out.is_empty() {
        return Err(NormalizeError::NoRows {
            report,
            columns: table.headers,
        });
    }
    debug!(rows = out.len(), ?reported_total, "normalized");
    Ok(Normalized {
        table: out,
        reported_total,
    })
}

fn count_value(cell: &Cell, column: &str, bucket: &str) -> Result<Option<i64>, NormalizeError> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Int(n) => Ok(Some(*n)),
        Cell::Text(s) => parse_count(s)
            .map(Some)
            .ok_or_else(|| NormalizeError::BadCount {
                column: column.to_string(),
                bucket: bucket.to_string(),
                value: s.clone(),
                cleaned: clean_count(s),
            }),
    }
}

fn lenient_count(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Int(n) => Some(*n),
        Cell::Text(s) => parse_count(s),
        Cell::Empty => None,
    }
}
