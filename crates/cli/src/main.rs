// Sitewatch CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: Support text/json/yaml output formats for scripting.
// Design Decision: Logs go to stderr so stdout stays parseable.
// Design Decision: Facilities and cameras persist in a local JSON state file
// between invocations; violations are always fetched from the backend.

mod commands;
mod output;
mod routes;
mod views;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sitewatch_core::{AppStore, ClientConfig, HttpBackendClient, StatePersistence};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "sitewatch")]
#[command(about = "Sitewatch CLI - Manage facilities, cameras and safety violations")]
#[command(version)]
pub struct Cli {
    /// Backend API base URL (overrides SITEWATCH_API_URL / SITEWATCH_API_HOST)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Local state file (overrides SITEWATCH_STATE_FILE)
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "text", value_parser = ["text", "json", "yaml"])]
    pub output: String,

    /// Suppress non-essential output
    #[arg(long, short)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show facility and camera counts
    Dashboard,

    /// Render a page by path (/, /facilities, /cameras, /violations)
    Route {
        /// Page path
        path: String,
    },

    /// Manage facilities
    Facilities {
        #[command(subcommand)]
        command: commands::facilities::FacilitiesCommand,
    },

    /// Manage cameras
    Cameras {
        #[command(subcommand)]
        command: commands::cameras::CamerasCommand,
    },

    /// Browse detected safety violations
    Violations {
        #[command(subcommand)]
        command: commands::violations::ViolationsCommand,
    },
}

fn init_tracing(quiet: bool) {
    let default_filter = if quiet {
        "sitewatch_cli=warn,sitewatch_core=warn"
    } else {
        "sitewatch_cli=info,sitewatch_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_base_url(url);
    }
    if let Some(path) = cli.state_file {
        config = config.with_state_file(path);
    }
    tracing::debug!(api = %config.api_base_url, state_file = %config.state_file.display(), "Configuration loaded");

    let backend =
        HttpBackendClient::from_config(&config).context("Failed to build HTTP client")?;
    let store = AppStore::with_persistence(
        Arc::new(backend),
        StatePersistence::file(config.state_file.clone()),
    )
    .with_context(|| format!("Failed to load state from {}", config.state_file.display()))?;

    let output_format = output::OutputFormat::from_str(&cli.output);

    match cli.command {
        Commands::Dashboard => commands::dashboard::dashboard(&store, output_format),
        Commands::Route { path } => commands::dashboard::route(&path, &store, output_format).await,
        Commands::Facilities { command } => {
            commands::facilities::run(command, &store, output_format, cli.quiet)
        }
        Commands::Cameras { command } => {
            commands::cameras::run(command, &store, &config, output_format, cli.quiet).await
        }
        Commands::Violations { command } => {
            commands::violations::run(command, &store, output_format).await
        }
    }
}
