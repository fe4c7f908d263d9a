// src/report/labels.rs

use std::fmt;

/// Label column value of the grand-total row.
pub const TOTAL_MARKER: &str = "Total";

/// Canonical header of the confirmed-case count column. Also appears as a
/// stray repeated header inside some extracted tables.
pub const TOTAL_CASES: &str = "Total Cases";

/// Label values that are not count buckets and are discarded.
pub const DROP_ROWS: &[&str] = &["Median Age (Range)", "Deaths"];

/// Grouping dimension that heads a run of bucket rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupLabel {
    AgeGroup,
    Age50AndOver,
    Sex,
    Borough,
}

impl GroupLabel {
    pub const ALL: [GroupLabel; 4] = [
        GroupLabel::AgeGroup,
        GroupLabel::Age50AndOver,
        GroupLabel::Sex,
        GroupLabel::Borough,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupLabel::AgeGroup => "Age Group",
            GroupLabel::Age50AndOver => "Age 50 and over",
            GroupLabel::Sex => "Sex",
            GroupLabel::Borough => "Borough",
        }
    }

    /// Exact match against the literal label; the PDFs never vary the casing.
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == s)
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_dropped_row(label: &str) -> bool {
    DROP_ROWS.contains(&label)
}
