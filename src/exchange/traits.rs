//! Record sink trait and exchange error types

use crate::exchange::Record;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while persisting a batch
///
/// These never escape [`crate::exchange::ExchangeChannel::flush`]; they are
/// logged and the batch is dropped.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Failed to create lock marker {path}: {source}")]
    Lock {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize batch: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write batch {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for exchange operations
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Destination for extracted records
///
/// The crawl engine only talks to the host through this trait: it pushes
/// records and polls for cancellation.
pub trait RecordSink {
    /// Queues a record for delivery
    fn insert(&mut self, record: Record);

    /// Returns true if the host asked the worker to stop
    fn is_cancelled(&self) -> bool;
}
