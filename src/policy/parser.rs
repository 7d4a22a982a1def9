//! Line-oriented settings parser.
//!
//! The settings file looks like YAML but is not parsed as YAML. Each of the
//! four labels is located by substring search and its value is read from the
//! lines around it:
//!
//! ```text
//! CheckUpdate: true
//! IdlePeriod: 1000
//! Protocol:
//!  - https
//!  - vrchat
//! Domain:
//!  - youtube.com
//! ```
//!
//! List items are the lines following a label that contain a `-`. The first
//! line without one ends the list. An item line for one list that happens to
//! sit right under another label's header is indistinguishable from that
//! label's own items; keep one label per line and separate lists with a
//! label or a blank line.

use crate::policy::types::{Policy, DEFAULT_IDLE_PERIOD_MS};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

pub const LABEL_CHECK_UPDATE: &str = "CheckUpdate:";
pub const LABEL_IDLE_PERIOD: &str = "IdlePeriod:";
pub const LABEL_PROTOCOL: &str = "Protocol:";
pub const LABEL_DOMAIN: &str = "Domain:";

/// Why the settings could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings are missing the '{0}' label")]
    MissingLabel(&'static str),

    #[error("settings end right after the '{0}' label")]
    MissingLine(&'static str),
}

/// Read and parse a settings file.
pub fn parse_policy_file(path: impl AsRef<Path>) -> Result<Policy, ConfigLoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_policy_str(&content)
}

/// Parse settings text. All four labels must be present.
pub fn parse_policy_str(data: &str) -> Result<Policy, ConfigLoadError> {
    let after_up = after_label(data, LABEL_CHECK_UPDATE)?;
    let after_ip = after_label(data, LABEL_IDLE_PERIOD)?;
    let after_p = after_label(data, LABEL_PROTOCOL)?;
    let after_d = after_label(data, LABEL_DOMAIN)?;

    let check_update = after_up
        .lines()
        .next()
        .ok_or(ConfigLoadError::MissingLine(LABEL_CHECK_UPDATE))?
        .contains("true");

    Ok(Policy {
        check_update,
        idle_period_ms: parse_idle_period(after_ip),
        allowed_protocols: parse_list(after_p),
        allowed_domains: parse_list(after_d),
    })
}

/// The text following the first occurrence of `label`.
fn after_label<'a>(data: &'a str, label: &'static str) -> Result<&'a str, ConfigLoadError> {
    data.find(label)
        .map(|i| &data[i + label.len()..])
        .ok_or(ConfigLoadError::MissingLabel(label))
}

/// Scan to the first digit and parse the rest of that line.
/// A `-` directly before the digit is kept so negative values are seen as such.
/// Anything unparseable or not positive falls back to the default.
fn parse_idle_period(text: &str) -> u64 {
    let Some(digit) = text.find(|c: char| c.is_ascii_digit()) else {
        return DEFAULT_IDLE_PERIOD_MS;
    };
    let start = if text[..digit].ends_with('-') {
        digit - 1
    } else {
        digit
    };
    let line = text[start..].lines().next().unwrap_or_default();

    match line.trim().parse::<i64>() {
        Ok(ms) if ms > 0 => ms as u64,
        _ => DEFAULT_IDLE_PERIOD_MS,
    }
}

/// Collect `- item` lines following the label's own line.
fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .skip(1)
        .map_while(|line| line.split_once('-').map(|(_, item)| item.trim().to_string()))
        .collect()
}

/// Holds the last successfully loaded policy and reloads it on demand.
pub struct ConfigStore {
    path: PathBuf,
    current: RwLock<Policy>,
}

impl ConfigStore {
    /// Start with the default policy; nothing is read until `reload`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            current: RwLock::new(Policy::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the settings file. On success the in-memory policy is replaced
    /// wholesale; on failure it is left untouched.
    pub fn reload(&self) -> Result<Policy, ConfigLoadError> {
        let policy = parse_policy_file(&self.path)?;
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = policy.clone();
        Ok(policy)
    }

    /// The last successfully loaded policy (or the defaults).
    #[cfg(test)]
    fn current(&self) -> Policy {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
