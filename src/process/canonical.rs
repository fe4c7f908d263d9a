use crate::report::GroupLabel;

/// One (group, bucket) entry with a value per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRow {
    /// `None` only for bucket rows that precede every group row.
    pub group: Option<GroupLabel>,
    pub bucket: String,
    pub values: Vec<Option<i64>>,
}

/// Normalized table keyed by (group, bucket), rows in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalTable {
    pub columns: Vec<String>,
    pub rows: Vec<CanonicalRow>,
}

impl CanonicalTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, group: Option<GroupLabel>, bucket: String, values: Vec<Option<i64>>) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(CanonicalRow {
            group,
            bucket,
            values,
        });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` for the first row keyed (group, bucket).
    pub fn get(&self, group: Option<GroupLabel>, bucket: &str, column: &str) -> Option<i64> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|r| r.group == group && r.bucket == bucket)
            .and_then(|r| r.values[col])
    }

    /// Remove a column by name, returning whether it existed.
    pub fn drop_column(&mut self, column: &str) -> bool {
        let Some(idx) = self.columns.iter().position(|c| c == column) else {
            return false;
        };
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.values.remove(idx);
        }
        true
    }
}
