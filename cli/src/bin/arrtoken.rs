//! `arrtoken` extracts the API token from an *arr configuration file and
//! writes it to stdout or a file, optionally tracking live edits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use arrkit_credentials::read_credentials;
use arrkit_watcher::{Destination, SyncOptions, commit};

#[derive(Debug, Parser)]
#[command(
    name = "arrtoken",
    version,
    about = "Extract the API token from an XML or YAML *arr configuration file",
    after_help = "Examples:\n  arrtoken /etc/bazarr/config.yaml\n  arrtoken --watch /etc/lidarr/config.xml /run/lidarr/token"
)]
struct Cli {
    /// Path to the configuration file (.xml, .yml or .yaml).
    config: PathBuf,

    /// Write the token to this file instead of stdout.
    output: Option<PathBuf>,

    /// Keep running and rewrite the output whenever the configuration
    /// changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    arrkit_cli::init_logging();
    let cli = Cli::parse();
    let destination = Destination::from(cli.output);

    if !cli.watch {
        let credentials = read_credentials(&cli.config)
            .with_context(|| format!("failed to read {}", cli.config.display()))?;
        commit(&credentials, &destination)?;
        return Ok(());
    }

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    arrkit_watcher::run(cancel, cli.config, destination, SyncOptions::default()).await?;
    Ok(())
}
