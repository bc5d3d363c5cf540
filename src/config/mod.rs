//! Configuration module for Hostcrawl
//!
//! The host launches a worker with the path of a JSON file describing the
//! run: the seed URL, the row limit, and the folders used for output and
//! logs. This module loads, validates and hashes that file, and parses the
//! free-form `params` text it carries.
//!
//! # Example
//!
//! ```no_run
//! use hostcrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("run.json")).unwrap();
//! println!("Crawl seed: {}", config.url);
//! ```

mod params;
mod parser;
mod types;
mod validation;

// Re-export types
pub use params::{parse_params, Params};
pub use types::{HostConfig, RowBudget, DEFAULT_BULK_SIZE, DEFAULT_FETCH_TIMEOUT_SECS};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_run_file};
pub use validation::validate;
