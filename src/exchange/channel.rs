//! Buffered, crash-safe delivery of records to the host

use crate::config::HostConfig;
use crate::exchange::lock::LockGuard;
use crate::exchange::{BatchFile, ExchangeError, ExchangeResult, Record, RecordSink};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Name of the file the host creates to cancel a run
pub const STOP_MARKER: &str = "STOP";

/// Output side of the host exchange protocol
///
/// Records are buffered and written in batches of `bulk_size`. Each batch
/// lands in a fresh file named by a random token; while it is written a
/// sibling `.lock` marker tells the host the file is not ready yet.
///
/// Delivery is at-most-once: a batch that fails to persist is logged and
/// dropped, never retried.
///
/// # Example
///
/// ```no_run
/// use hostcrawl::exchange::{ExchangeChannel, Record};
///
/// let mut channel = ExchangeChannel::new("/data/out", 10);
/// channel.insert(Record::new("https://example.com").with_title("Example"));
/// channel.close();
/// ```
#[derive(Debug)]
pub struct ExchangeChannel {
    output_dir: PathBuf,
    bulk_size: usize,
    buffer: Vec<Record>,
    batches_written: usize,
    records_dropped: usize,
    closed: bool,
}

impl ExchangeChannel {
    /// Creates a channel writing into `output_dir`
    ///
    /// A `bulk_size` of zero is treated as one.
    pub fn new(output_dir: impl Into<PathBuf>, bulk_size: usize) -> Self {
        Self {
            output_dir: output_dir.into(),
            bulk_size: bulk_size.max(1),
            buffer: Vec::new(),
            batches_written: 0,
            records_dropped: 0,
            closed: false,
        }
    }

    /// Creates a channel for the output folder and bulk size of a run
    pub fn from_config(config: &HostConfig) -> Self {
        Self::new(&config.output_folder, config.bulk_size)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn bulk_size(&self) -> usize {
        self.bulk_size
    }

    /// Changes the batch size, flushing at once if the buffer already reaches it
    pub fn set_bulk_size(&mut self, bulk_size: usize) {
        self.bulk_size = bulk_size.max(1);
        if self.buffer.len() >= self.bulk_size {
            self.flush();
        }
    }

    /// Number of records waiting for the next flush
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Number of batch files written so far
    pub fn batches_written(&self) -> usize {
        self.batches_written
    }

    /// Number of records lost to failed flushes
    pub fn records_dropped(&self) -> usize {
        self.records_dropped
    }

    /// Appends a record to the current batch, flushing when the batch is full
    pub fn insert(&mut self, record: Record) {
        tracing::trace!("Buffering record {}", record.locator);
        self.buffer.push(record);
        if self.buffer.len() >= self.bulk_size {
            self.flush();
        }
    }

    /// Persists the current batch and clears the buffer
    ///
    /// Failures are logged; the records of a failed batch are lost.
    /// An empty buffer writes nothing.
    pub fn flush(&mut self) {
        self.flush_with(|target, payload| fs::write(target, payload));
    }

    fn flush_with<W>(&mut self, write: W)
    where
        W: FnOnce(&Path, &[u8]) -> io::Result<()>,
    {
        if self.buffer.is_empty() {
            return;
        }

        let batch = std::mem::take(&mut self.buffer);
        let target = self.output_dir.join(Uuid::new_v4().simple().to_string());
        match self.write_batch_to(&target, &batch, write) {
            Ok(()) => {
                self.batches_written += 1;
                tracing::debug!("Wrote {} rows to {}", batch.len(), target.display());
            }
            Err(e) => {
                self.records_dropped += batch.len();
                tracing::warn!("Failed to insert {} rows because of: {}", batch.len(), e);
            }
        }
    }

    /// Returns true iff the host's `STOP` marker is present right now
    pub fn is_cancelled(&self) -> bool {
        self.output_dir.join(STOP_MARKER).is_file()
    }

    /// Finishes the run: flushes what is left unless the host cancelled it
    ///
    /// Returns the total number of batch files written.
    pub fn close(mut self) -> usize {
        self.finish();
        self.batches_written
    }

    fn finish(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if self.buffer.is_empty() {
            return;
        }

        if self.is_cancelled() {
            tracing::info!(
                "Run cancelled, discarding {} unflushed rows",
                self.buffer.len()
            );
            self.buffer.clear();
        } else {
            self.flush();
        }
    }

    /// Writes `batch` to `target` under its lock marker
    ///
    /// The payload is serialized before the marker is placed. A failed write
    /// removes whatever reached `target`.
    fn write_batch_to<W>(&self, target: &Path, batch: &[Record], write: W) -> ExchangeResult<()>
    where
        W: FnOnce(&Path, &[u8]) -> io::Result<()>,
    {
        let payload = serde_json::to_vec(&BatchFile {
            docs: batch.iter().map(Record::to_document).collect(),
        })?;

        let _lock = LockGuard::acquire(target)?;
        if let Err(source) = write(target, &payload) {
            // never leave a truncated batch behind for the host
            if target.is_file() {
                let _ = fs::remove_file(target);
            }
            return Err(ExchangeError::Write {
                path: target.to_path_buf(),
                source,
            });
        }

        Ok(())
    }
}

impl RecordSink for ExchangeChannel {
    fn insert(&mut self, record: Record) {
        ExchangeChannel::insert(self, record);
    }

    fn is_cancelled(&self) -> bool {
        ExchangeChannel::is_cancelled(self)
    }
}

impl Drop for ExchangeChannel {
    fn drop(&mut self) {
        self.finish();
    }
}
