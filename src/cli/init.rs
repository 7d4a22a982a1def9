//! `openbrowser init` — write a starter settings file.

use crate::policy::defaults::STARTER_SETTINGS;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;

/// Run the `openbrowser init` command.
pub fn run_init(output_file: &Path, force: bool) -> Result<()> {
    if output_file.exists() && !force {
        bail!(
            "A settings file already exists at {} (use --force to overwrite it)",
            output_file.display()
        );
    }

    std::fs::write(output_file, STARTER_SETTINGS)
        .with_context(|| format!("Failed to write settings file: {}", output_file.display()))?;

    println!();
    println!(
        "  {} Created {}",
        "✓".green().bold(),
        output_file.display().to_string().bold()
    );
    println!();
    println!("  {} Next steps:", "→".blue());
    println!(
        "    1. Add the sites you want to open under {}",
        "Domain:".dimmed()
    );
    println!("    2. Check the result: {}", "openbrowser check".dimmed());
    println!("    3. Start the server: {}", "openbrowser serve".dimmed());
    println!();

    Ok(())
}
