pub mod assemble;
pub mod write;

pub use assemble::{assemble, Series, SeriesRow};
pub use write::{write_csv, write_parquet};
