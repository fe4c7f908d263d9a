// src/process/mod.rs
pub mod canonical;
pub mod cells;
pub mod layout;
pub mod normalize;
pub mod raw_table;

pub use canonical::{CanonicalRow, CanonicalTable};
pub use layout::{classify, Layout};
pub use normalize::{normalize, NormalizeError, Normalized};
pub use raw_table::{Cell, RawTable};
