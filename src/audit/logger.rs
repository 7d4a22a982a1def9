//! Activity log writer — one line per event, appended to a text file.
//!
//! Fields are joined with `", "` and stamped with the local time:
//! `Open URL, https://example.com/ at 2026-10-16 21:04:11`.
//! The file is opened, appended and closed for every line. Write failures are
//! reported through `tracing` and never reach the caller.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default log file name, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "openbrowser.log";

/// Append-only activity log shared by every request.
#[derive(Debug)]
pub struct ActivityLog {
    /// Path to the log file
    log_path: PathBuf,
    /// Echo each line to stdout
    echo: bool,
    /// Serializes writers so lines never interleave
    write_lock: Mutex<()>,
}

impl ActivityLog {
    /// Create a logger writing to `path`. Nothing is opened until the first line.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            log_path: path.as_ref().to_path_buf(),
            echo: true,
            write_lock: Mutex::new(()),
        }
    }

    /// Stop echoing lines to stdout.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Log one event. Never fails.
    pub fn log(&self, fields: &[&str]) {
        let joined = fields.join(", ");
        if self.echo {
            println!("{}", joined);
        }

        let line = format!("{} at {}", joined, Local::now().format("%Y-%m-%d %H:%M:%S"));
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = self.append(&line) {
            tracing::warn!("Failed to write activity log: {:#}", e);
        }
    }

    fn append(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create log directory: {}", parent.display())
            })?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open log file: {}", self.log_path.display()))?;
        writeln!(file, "{}", line).context("Failed to write log line")?;
        file.flush().context("Failed to flush log file")?;
        Ok(())
    }

    /// Get the path to the log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
