//! Lock markers guarding batch files while they are written

use crate::exchange::{ExchangeError, ExchangeResult};
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Extension of the marker placed next to a batch file being written
pub const LOCK_EXTENSION: &str = "lock";

/// Scoped lock marker
///
/// Creating the guard creates `<target>.lock`; dropping it removes the
/// marker, whether or not the write in between succeeded.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    /// Places the marker for `target`
    pub fn acquire(target: &Path) -> ExchangeResult<Self> {
        let path = lock_path(target);
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|source| ExchangeError::Lock {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path })
    }

    /// Path of the marker file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("Failed to remove lock marker {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Returns the marker path for a batch file
pub fn lock_path(target: &Path) -> PathBuf {
    target.with_extension(LOCK_EXTENSION)
}
