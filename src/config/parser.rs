//! Loading of the run file the host writes before launching a worker

use crate::config::types::HostConfig;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads the host's run file, parses it and validates the result
///
/// # Arguments
///
/// * `path` - The JSON run file named on the worker's command line
///
/// # Returns
///
/// * `Ok(HostConfig)` - The settings for this run
/// * `Err(ConfigError)` - The file is unreadable, not a run file, or fails validation
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use hostcrawl::config::load_config;
///
/// let config = load_config(Path::new("run.json")).unwrap();
/// println!("Output folder: {}", config.output_folder.display());
/// ```
pub fn load_config(path: &Path) -> ConfigResult<HostConfig> {
    parse_run_file(&std::fs::read(path)?)
}

/// Parses and validates the bytes of a run file
///
/// Fields the host omits fall back to their defaults; `output_folder` and
/// `log_folder` are required.
pub fn parse_run_file(content: &[u8]) -> ConfigResult<HostConfig> {
    let config: HostConfig = serde_json::from_slice(content)?;
    validate(&config)?;
    Ok(config)
}

/// Hex SHA-256 of the run file, logged so a run can be matched to the
/// settings the host handed over
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    Ok(content_hash(&std::fs::read(path)?))
}

/// Loads the run file and hashes the same bytes that were parsed
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(HostConfig, String)> {
    let content = std::fs::read(path)?;
    let config = parse_run_file(&content)?;
    Ok((config, content_hash(&content)))
}

fn content_hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}
