//! Storage module for persisting crawl and harvest output
//!
//! This module handles the two durable outputs:
//! - The resource-link store written by the crawler
//! - The dataset store written by the harvester
//!
//! Both are append-only; nothing in this crate rewrites or deletes entries
//! except an explicit `--fresh` run.

mod lines;
mod traits;

pub use lines::{read_links, read_records, DatasetFile, LinkFile, OpenMode, StoredRecords};
pub use traits::{RecordSink, ResourceSink, StorageError, StorageResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A harvested resource paired with its generated prompt
///
/// Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub source_url: String,
    pub filename: String,
    pub prompt: String,
    pub content: String,
    pub provenance: Provenance,
}

/// Where a dataset record came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Scheme and host of the source URL
    pub origin: String,
    pub source: String,
    pub category: String,
    pub harvested_at: DateTime<Utc>,
}
