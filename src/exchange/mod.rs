//! Exchange module for handing records to the host
//!
//! The host and the worker share one output directory:
//! - the worker writes batch files, each guarded by a transient `.lock` marker
//! - the host reads a batch file once its marker is gone
//! - the host creates a `STOP` file to ask the worker to finish early

mod channel;
mod lock;
mod record;
mod traits;

pub use channel::{ExchangeChannel, STOP_MARKER};
pub use lock::{LockGuard, LOCK_EXTENSION};
pub use record::{BatchFile, Document, Record};
pub use traits::{ExchangeError, ExchangeResult, RecordSink};
