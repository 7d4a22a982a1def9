//! Hands URLs and paths to the operating system's default handler.

use crate::audit::ActivityLog;
use anyhow::{Context, Result};
use std::sync::Mutex;

/// Opens a URL or local path with whatever the OS considers its handler.
/// Implementations must return without waiting for the handler to finish.
pub trait Launcher: Send + Sync {
    fn launch(&self, target: &str) -> Result<()>;
}

/// Launcher backed by the platform's opener command.
///
/// - macOS: `open`
/// - Linux: `xdg-open`
/// - Windows: `rundll32 url.dll,FileProtocolHandler`
///
/// Must be called from within a tokio runtime; the child is reaped in the
/// background.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, target: &str) -> Result<()> {
        #[cfg(target_os = "macos")]
        let mut cmd = tokio::process::Command::new("open");

        #[cfg(target_os = "windows")]
        let mut cmd = {
            let mut c = tokio::process::Command::new("rundll32");
            c.arg("url.dll,FileProtocolHandler");
            c
        };

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let mut cmd = tokio::process::Command::new("xdg-open");

        cmd.arg(target)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start default handler for {}", target))?;
        Ok(())
    }
}

/// Launcher that only remembers what it was asked to open.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    launched: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched(&self) -> Vec<String> {
        self.launched
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, target: &str) -> Result<()> {
        self.launched
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(target.to_string());
        Ok(())
    }
}

/// Record the launch in the activity log, then hand `url` to the launcher.
/// A launcher failure is logged, not returned.
pub fn open_url(launcher: &dyn Launcher, log: &ActivityLog, url: &str) {
    log.log(&["Open URL", url]);
    if let Err(e) = launcher.launch(url) {
        let detail = format!("{:#}", e);
        tracing::error!("{}", detail);
        log.log(&["Could not open URL", url, detail.as_str()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use tempfile::TempDir;

    struct FailingLauncher;

    impl Launcher for FailingLauncher {
        fn launch(&self, _target: &str) -> Result<()> {
            bail!("no handler")
        }
    }

    #[test]
    fn test_open_url_logs_and_launches() {
        let tmp = TempDir::new().unwrap();
        let log = ActivityLog::with_path(tmp.path().join("a.log")).quiet();
        let launcher = RecordingLauncher::new();

        open_url(&launcher, &log, "https://example.com/");

        assert_eq!(launcher.launched(), vec!["https://example.com/"]);
        let content = std::fs::read_to_string(log.log_path()).unwrap();
        assert!(content.starts_with("Open URL, https://example.com/ at "));
    }

    #[test]
    fn test_launch_failure_is_logged_not_raised() {
        let tmp = TempDir::new().unwrap();
        let log = ActivityLog::with_path(tmp.path().join("a.log")).quiet();

        open_url(&FailingLauncher, &log, "https://example.com/");

        let content = std::fs::read_to_string(log.log_path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("Could not open URL, https://example.com/, no handler"));
    }
}
