use crate::config::params::{parse_params, Params};
use crate::ConfigResult;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Number of records buffered before a batch file is written
pub const DEFAULT_BULK_SIZE: usize = 10;

/// Per-request fetch timeout used when the host does not set one
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Run configuration handed to a worker by the host
#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    /// Crawl seed or target URL (may be empty for sources with a fixed seed)
    #[serde(default)]
    pub url: String,

    /// Maximum number of rows to emit; `null` means unbounded
    #[serde(default)]
    pub maximum_rows: Option<u64>,

    /// Directory shared with the host for batch files and the stop marker
    pub output_folder: PathBuf,

    /// Directory for the worker's log file
    pub log_folder: PathBuf,

    /// Enables debug-level logging
    #[serde(default)]
    pub debug_mode: bool,

    /// Host-defined INI text, see [`crate::config::parse_params`]
    #[serde(default)]
    pub params: String,

    /// Records per batch file
    #[serde(default = "default_bulk_size")]
    pub bulk_size: usize,

    /// Upper bound on a single page fetch, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_bulk_size() -> usize {
    DEFAULT_BULK_SIZE
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

impl HostConfig {
    /// Row budget derived from `maximum_rows`
    pub fn row_budget(&self) -> RowBudget {
        RowBudget::from_maximum_rows(self.maximum_rows)
    }

    /// Fetch timeout as a duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Entries of the `DEFAULT` section of `params`
    pub fn parameters(&self) -> ConfigResult<Params> {
        parse_params(&self.params)
    }
}

/// Ceiling on the number of records emitted during the fetch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowBudget {
    #[default]
    Unbounded,
    Limited(u64),
}

impl RowBudget {
    /// Builds a budget from the host's `maximum_rows` field
    ///
    /// The host sends `null` or `0` when no limit was set.
    pub fn from_maximum_rows(maximum_rows: Option<u64>) -> Self {
        match maximum_rows {
            None | Some(0) => Self::Unbounded,
            Some(limit) => Self::Limited(limit),
        }
    }

    /// Returns true once `emitted` records have used up the budget
    pub fn is_exhausted(&self, emitted: u64) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Limited(limit) => emitted >= *limit,
        }
    }
}
