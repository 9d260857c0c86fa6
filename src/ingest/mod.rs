//! Ingestion of raw research-tree data.

mod record;

pub use record::{extract_records, normalize_record};
