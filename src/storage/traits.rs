//! Storage traits and error types
//!
//! This module defines the sink interfaces the crawler and harvester write
//! through, and the associated error type.

use crate::storage::DatasetRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable destination for discovered resource URLs
///
/// `persist_resource` must not return until the URL is handed to the
/// operating system, so a crash after registration never loses it.
pub trait ResourceSink {
    fn persist_resource(&mut self, url: &str) -> StorageResult<()>;
}

/// Durable destination for dataset records
///
/// Each call writes exactly one self-contained record.
pub trait RecordSink {
    fn append_record(&mut self, record: &DatasetRecord) -> StorageResult<()>;
}

/// In-memory sink, mostly useful in tests
impl ResourceSink for Vec<String> {
    fn persist_resource(&mut self, url: &str) -> StorageResult<()> {
        self.push(url.to_string());
        Ok(())
    }
}

impl RecordSink for Vec<DatasetRecord> {
    fn append_record(&mut self, record: &DatasetRecord) -> StorageResult<()> {
        self.push(record.clone());
        Ok(())
    }
}

impl<S: ResourceSink + ?Sized> ResourceSink for Box<S> {
    fn persist_resource(&mut self, url: &str) -> StorageResult<()> {
        (**self).persist_resource(url)
    }
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn append_record(&mut self, record: &DatasetRecord) -> StorageResult<()> {
        (**self).append_record(record)
    }
}
