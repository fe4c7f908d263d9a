use chrono::NaiveDateTime;
use tracing::debug;

use crate::cache::DUPLICATE_ARTIFACT_COLUMN;
use crate::process::CanonicalTable;
use crate::report::{GroupLabel, ReportId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRow {
    pub timestamp: NaiveDateTime,
    pub group: Option<GroupLabel>,
    pub bucket: String,
    pub values: Vec<Option<i64>>,
}

/// Long-form series keyed by (timestamp, group, bucket).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Series {
    pub columns: Vec<String>,
    pub rows: Vec<SeriesRow>,
}

impl Series {
    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        let mut out: Vec<NaiveDateTime> = Vec::new();
        for row in &self.rows {
            if !out.contains(&row.timestamp) {
                out.push(row.timestamp);
            }
        }
        out
    }
}

/// Concatenate cached tables into one series, in the order given.
///
/// Every row is keyed by its document's timestamp. Value columns are the
/// union of all tables' columns in first-seen order; a table lacking a
/// column contributes `None`. Overlapping timestamps are kept as-is.
pub fn assemble(entries: Vec<(ReportId, CanonicalTable)>) -> Series {
    let mut series = Series::default();

    for (id, mut table) in entries {
        table.drop_column(DUPLICATE_ARTIFACT_COLUMN);
        let timestamp = id.timestamp();

        let positions: Vec<usize> = table
            .columns
            .iter()
            .map(|c| match series.columns.iter().position(|s| s == c) {
                Some(p) => p,
                None => {
                    series.columns.push(c.clone());
                    series.columns.len() - 1
                }
            })
            .collect();

        debug!(id = %id, rows = table.len(), "assembling entry");
        for row in table.rows {
            let mut values = vec![None; series.columns.len()];
            for (v, &p) in row.values.into_iter().zip(&positions) {
                values[p] = v;
            }
            series.rows.push(SeriesRow {
                timestamp,
                group: row.group,
                bucket: row.bucket,
                values,
            });
        }
    }

    // earlier rows were sized before later columns appeared
    let width = series.columns.len();
    for row in &mut series.rows {
        row.values.resize(width, None);
    }
    series
}
