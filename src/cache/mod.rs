pub mod store;

pub use store::{CacheStore, DUPLICATE_ARTIFACT_COLUMN};
