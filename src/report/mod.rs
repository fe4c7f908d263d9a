pub mod labels;
pub mod types;

pub use labels::{GroupLabel, DROP_ROWS, TOTAL_CASES, TOTAL_MARKER};
pub use types::{Part, ReportId, ReportIdError, ReportType};
