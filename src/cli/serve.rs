//! `openbrowser serve` — run the open-URL listener.
//!
//! Loads the settings once for the startup update check, binds the listener,
//! and serves until Ctrl-C. The settings are re-read on every request after
//! that, so edits take effect without a restart.

use crate::audit::ActivityLog;
use crate::gateway::launcher::{self, Launcher, SystemLauncher};
use crate::gateway::{GatewayServer, GatewayState};
use crate::policy::defaults::RELEASES_URL;
use crate::policy::{ConfigStore, RateState, UrlValidator};
use anyhow::Result;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

/// Options for the `serve` command.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub settings_path: PathBuf,
    pub log_path: PathBuf,
    pub bind: IpAddr,
    pub port: u16,
    pub prefix: String,
    pub update_check: bool,
}

/// Run the `openbrowser serve` command.
pub async fn run_serve(options: ServeOptions) -> Result<()> {
    let rate = Arc::new(RateState::new());
    let log = Arc::new(ActivityLog::with_path(&options.log_path));
    let launcher: Arc<dyn Launcher> = Arc::new(SystemLauncher);
    let store = ConfigStore::new(&options.settings_path);

    startup_update_check(&store, launcher.as_ref(), &log, options.update_check);

    log.log(&["Start"]);

    let validator = UrlValidator::new(store, rate, log.clone());
    let state = GatewayState::new(validator, launcher, log.clone(), options.prefix);
    let addr = SocketAddr::new(options.bind, options.port);

    serve_until(GatewayServer::new(addr, state), &log, shutdown_signal()).await
}

/// Run the server and record how it ended. `Stop` is only logged after a
/// clean shutdown; a bind or serve failure is logged instead.
async fn serve_until(
    server: GatewayServer,
    log: &ActivityLog,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    match server.run(shutdown).await {
        Ok(()) => {
            log.log(&["Stop"]);
            Ok(())
        }
        Err(e) => {
            let detail = format!("{:#}", e);
            log.log(&["Server failed", detail.as_str()]);
            Err(e)
        }
    }
}

/// Open the releases page if the settings ask for it.
pub fn startup_update_check(
    store: &ConfigStore,
    launcher: &dyn Launcher,
    log: &ActivityLog,
    enabled: bool,
) {
    match store.reload() {
        Ok(policy) => {
            if enabled && policy.check_update {
                launcher::open_url(launcher, log, RELEASES_URL);
            }
        }
        Err(e) => {
            tracing::warn!(settings = %store.path().display(), "{}", e);
            log.log(&["Could not load the settings"]);
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
