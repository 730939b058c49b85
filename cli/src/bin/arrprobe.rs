//! `arrprobe` checks whether a running *arr instance is ready, exiting
//! non-zero when it is not.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use clap::{ArgGroup, Parser, ValueEnum};

use arrkit_credentials::read_credentials;
use arrkit_readiness::{Application, ReadinessProbe};

#[derive(Debug, Parser)]
#[command(
    name = "arrprobe",
    version,
    about = "Check whether an *arr instance is ready",
    after_help = "Examples:\n  arrprobe bazarr https://bazarr.example.com:8443 --config /etc/bazarr/config.yaml\n  arrprobe sonarr https://sonarr.example.com:8443 --api-token my-token"
)]
#[command(group(
    ArgGroup::new("credential")
        .required(true)
        .args(["api_token", "config"])
))]
struct Cli {
    /// Application flavour running at the URL.
    #[arg(value_enum)]
    application: ApplicationArg,

    /// Base URL of the instance to probe.
    url: String,

    /// API token to authenticate the probe with.
    #[arg(long)]
    api_token: Option<String>,

    /// Extract the token from this XML or YAML configuration file instead.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trust invalid TLS certificates.
    #[arg(long)]
    insecure: bool,

    /// Probe timeout in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,
}

/// clap-facing mirror of [`Application`].
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ApplicationArg {
    Bazarr,
    Lidarr,
    Prowlarr,
    Radarr,
    Readarr,
    Sabnzbd,
    Sonarr,
}

impl From<ApplicationArg> for Application {
    fn from(arg: ApplicationArg) -> Self {
        match arg {
            ApplicationArg::Bazarr => Self::Bazarr,
            ApplicationArg::Lidarr => Self::Lidarr,
            ApplicationArg::Prowlarr => Self::Prowlarr,
            ApplicationArg::Radarr => Self::Radarr,
            ApplicationArg::Readarr => Self::Readarr,
            ApplicationArg::Sabnzbd => Self::Sabnzbd,
            ApplicationArg::Sonarr => Self::Sonarr,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    arrkit_cli::init_logging();
    let cli = Cli::parse();

    let token = match (&cli.api_token, &cli.config) {
        (Some(token), None) => token.clone(),
        (None, Some(path)) => {
            read_credentials(path)
                .with_context(|| format!("failed to read {}", path.display()))?
                .token
        }
        // The ArgGroup makes these unrepresentable from the command line.
        _ => bail!("either --api-token or --config must be given, not both"),
    };
    ensure!(!token.is_empty(), "no API token found");

    let application = Application::from(cli.application);
    ReadinessProbe::new(&cli.url)
        .query(application.token_query_key(), token)
        .insecure(cli.insecure)
        .timeout(Duration::from_secs(cli.timeout))
        .run()
        .await
        .with_context(|| format!("{application} instance at {} is not ready", cli.url))?;

    Ok(())
}
