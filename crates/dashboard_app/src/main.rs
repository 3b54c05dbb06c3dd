mod platform;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dashboard_logging::{dash_warn, LogSettings};
use platform::{install_logger, ApiSource, AppConfig};

#[derive(Parser, Debug)]
#[command(
    name = "dashboard",
    version,
    about = "Item dashboard: HTTP item service and terminal browser",
    long_about = None
)]
struct Cli {
    /// RON configuration file. Defaults to ./dashboard.ron when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP item service.
    Serve {
        /// Address to listen on, overriding `bind_addr`.
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Browse items interactively from the terminal.
    Browse {
        /// Base URL of a running item service, overriding `api_base_url`.
        #[arg(long, conflicts_with = "local")]
        api_url: Option<String>,
        /// Use an in-process seeded store instead of the HTTP service.
        #[arg(long)]
        local: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            start_logging(&config.serve_log_attempts());
            platform::run_serve(&config)
        }
        Commands::Browse { api_url, local } => {
            if let Some(api_url) = api_url {
                config.api_base_url = api_url;
            }
            start_logging(&config.browse_log_attempts());
            let source = if local {
                ApiSource::Local
            } else {
                ApiSource::Remote(config.api_base_url.clone())
            };
            platform::run_browse(&config, source)
        }
    }
}

fn start_logging(attempts: &[LogSettings]) {
    match install_logger(attempts, dashboard_logging::initialize) {
        Some(settings) if attempts.first() != Some(settings) => {
            dash_warn!(
                "configured logger unavailable, logging {:?} to {}",
                settings.destination,
                settings.file.display()
            );
        }
        Some(_) => {}
        None => eprintln!("warning: logging disabled, no logger could be installed"),
    }
}
