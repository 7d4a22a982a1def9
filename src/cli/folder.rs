//! `openbrowser open-folder` — show the working directory in the file manager,
//! where the settings and log files live.

use crate::gateway::launcher::{Launcher, SystemLauncher};
use anyhow::Result;

/// Run the `openbrowser open-folder` command.
pub fn run_open_folder() -> Result<()> {
    SystemLauncher.launch(".")
}
