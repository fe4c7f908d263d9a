pub mod cache;
pub mod config;
pub mod driver;
pub mod fetch;
pub mod process;
pub mod report;
pub mod series;
