//! Parser for the host's `params` text
//!
//! The host passes per-run parameters as INI text. Only the `DEFAULT`
//! section is meaningful to a worker; keys are case-sensitive.

use crate::ConfigError;
use std::collections::BTreeMap;

/// Flat key/value view of the `DEFAULT` section
pub type Params = BTreeMap<String, String>;

const DEFAULT_SECTION: &str = "DEFAULT";

/// Parses INI text and returns the entries of its `DEFAULT` section
///
/// # Format
///
/// - `[SECTION]` headers; entries before the first header belong to `DEFAULT`
/// - `key = value` or `key: value` (the first delimiter wins)
/// - a bare `key` maps to an empty value
/// - `#` and `;` start comment lines, blank lines are skipped
/// - an indented line continues the previous value
///
/// # Example
///
/// ```
/// use hostcrawl::config::parse_params;
///
/// let params = parse_params("[DEFAULT]\nCategory = news\n").unwrap();
/// assert_eq!(params.get("Category").map(String::as_str), Some("news"));
/// ```
pub fn parse_params(text: &str) -> Result<Params, ConfigError> {
    let mut params = Params::new();
    let mut in_default = true;
    let mut last_key: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if raw.starts_with(char::is_whitespace) {
            if let Some(key) = &last_key {
                if in_default {
                    if let Some(value) = params.get_mut(key) {
                        value.push('\n');
                        value.push_str(trimmed);
                    }
                }
                continue;
            }
        }

        if let Some(header) = trimmed.strip_prefix('[') {
            let name = header.strip_suffix(']').ok_or_else(|| ConfigError::Params {
                line: line_no,
                message: format!("unterminated section header '{}'", trimmed),
            })?;
            in_default = name.trim() == DEFAULT_SECTION;
            last_key = None;
            continue;
        }

        let (key, value) = match trimmed.find(&['=', ':'][..]) {
            Some(pos) => (trimmed[..pos].trim(), trimmed[pos + 1..].trim()),
            None => (trimmed, ""),
        };

        if key.is_empty() {
            return Err(ConfigError::Params {
                line: line_no,
                message: "entry without a key".to_string(),
            });
        }

        if in_default {
            if params.contains_key(key) {
                return Err(ConfigError::Params {
                    line: line_no,
                    message: format!("duplicate key '{}'", key),
                });
            }
            params.insert(key.to_string(), value.to_string());
        }
        last_key = Some(key.to_string());
    }

    Ok(params)
}
