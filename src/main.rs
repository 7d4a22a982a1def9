//! openbrowser — open allowlisted links sent to a local HTTP endpoint.
//!
//! Quick start:
//!   openbrowser init      # write a starter setting.yaml
//!   openbrowser check     # see what the settings allow
//!   openbrowser           # serve http://+:80/Temporary_Listen_Addresses/openURL/
//!
//! For more info: openbrowser --help

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use openbrowser::audit::logger::DEFAULT_LOG_FILE;
use openbrowser::cli;
use openbrowser::gateway::protocol::DEFAULT_PREFIX;
use openbrowser::policy::defaults::DEFAULT_SETTINGS_FILE;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// openbrowser — opens links other programs send it, if the settings allow them.
#[derive(Parser)]
#[command(
    name = "openbrowser",
    version,
    about = "Open allowlisted URLs requested over a local HTTP endpoint",
    long_about = "openbrowser listens for requests to /Temporary_Listen_Addresses/openURL/<url>\n\
                  and opens <url> in your default browser when its protocol and domain\n\
                  are allowed by the settings file.\n\n\
                  Quick start:\n  \
                  openbrowser init     # write a starter setting.yaml\n  \
                  openbrowser check    # see what the settings allow\n  \
                  openbrowser          # start serving",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Settings file, re-read on every request
    #[arg(
        short,
        long,
        global = true,
        env = "OPENBROWSER_CONFIG",
        default_value = DEFAULT_SETTINGS_FILE
    )]
    config: PathBuf,

    /// Activity log file
    #[arg(long, global = true, env = "OPENBROWSER_LOG", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the open-URL server (the default)
    Serve(ServeArgs),

    /// Validate the settings file, optionally against a URL
    Check {
        /// URL to evaluate (no cooldown, nothing is opened)
        #[arg(short, long)]
        url: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a starter settings file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Open the working directory in the file manager
    OpenFolder,
}

#[derive(Args, Clone)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "OPENBROWSER_PORT", default_value_t = 80)]
    port: u16,

    /// Path prefix to answer under
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Skip opening the releases page at startup
    #[arg(long)]
    no_update_check: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("openbrowser=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => run_serve(&cli.config, &cli.log_file, cli.serve).await,
        Some(Commands::Serve(args)) => run_serve(&cli.config, &cli.log_file, args).await,
        Some(Commands::Check { url, json }) => {
            cli::check::run_check(&cli.config, url.as_deref(), json)
        }
        Some(Commands::Init { force }) => cli::init::run_init(&cli.config, force),
        Some(Commands::OpenFolder) => cli::folder::run_open_folder(),
    };

    if let Err(e) = result {
        eprintln!();
        eprintln!("  {} {}", "✗".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
        eprintln!();
        std::process::exit(1);
    }
}

async fn run_serve(
    config: &std::path::Path,
    log_file: &std::path::Path,
    args: ServeArgs,
) -> anyhow::Result<()> {
    let options = cli::serve::ServeOptions {
        settings_path: config.to_path_buf(),
        log_path: log_file.to_path_buf(),
        bind: args.bind,
        port: args.port,
        prefix: args.prefix,
        update_check: !args.no_update_check,
    };
    cli::serve::run_serve(options).await
}
