//! `openbrowser check` — show the effective settings and try a URL.
//!
//! Parses the settings file exactly as the server would and prints what it
//! understood. With `--url`, runs the syntax, protocol and domain checks on
//! that URL. The cooldown is not applied and nothing is opened.

use crate::policy::engine::check_url;
use crate::policy::parser::parse_policy_file;
use crate::policy::types::{Policy, Verdict};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    settings: &'a Policy,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Verdict>,
}

/// Run the `openbrowser check` command.
pub fn run_check(settings_path: &Path, url: Option<&str>, json: bool) -> Result<()> {
    let policy = parse_policy_file(settings_path)
        .with_context(|| format!("Settings are not usable: {}", settings_path.display()))?;
    let verdict = url.map(|u| Verdict::from(check_url(&policy, u)));

    if json {
        let report = CheckReport {
            settings: &policy,
            url,
            result: verdict,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("  {} Settings are valid!", "✓".green().bold());
    println!(
        "  File:         {}",
        settings_path.display().to_string().dimmed()
    );
    println!(
        "  Update check: {}",
        if policy.check_update {
            "on".cyan()
        } else {
            "off".cyan()
        }
    );
    println!("  Idle period:  {}ms", policy.idle_period_ms.to_string().cyan());
    print_list("Protocols", &policy.allowed_protocols);
    print_list("Domains", &policy.allowed_domains);

    if let (Some(url), Some(verdict)) = (url, verdict) {
        println!();
        match verdict {
            Verdict::Accepted => {
                println!("  {} {} would be opened", "✓".green().bold(), url.bold())
            }
            Verdict::Rejected(r) => {
                println!("  {} {} would be rejected", "✗".red().bold(), url.bold());
                println!("    {}", r.to_string().dimmed());
            }
        }
    }

    println!();
    Ok(())
}

fn print_list(name: &str, items: &[String]) {
    println!();
    if items.is_empty() {
        println!(
            "  {}: {}",
            name,
            "(none, nothing will be opened)".yellow()
        );
        return;
    }
    println!("  {}:", name);
    for item in items {
        println!("    • {}", item);
    }
}
