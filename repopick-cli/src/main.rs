use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use repopick_core::SettingsManager;

mod commands;
mod server;

#[derive(Parser, Debug)]
#[command(name = "repopick")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse a repository, bundle files, and fast-forward it from its remote")]
struct Args {
    /// Settings file (defaults to ./repopick.toml; missing file means defaults)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP interface (default)
    Serve {
        /// Overrides `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Overrides `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the repository tree as JSON
    Tree,
    /// Print known remote branches, one per line
    Branches,
    /// Print the concatenated contents of the given files
    Read {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Fetch and fast-forward the repository
    Update {
        /// Branch to pull (defaults to `repo.branch`)
        #[arg(long)]
        branch: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let args = Args::parse();

    let settings = match args.config {
        Some(path) => SettingsManager::from_path(path)?,
        None => SettingsManager::new()?,
    };
    info!(config = ?settings.path(), "Settings loaded");

    match args.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            let defaults = &settings.settings().server;
            let host = host.unwrap_or_else(|| defaults.host.clone());
            let port = port.unwrap_or(defaults.port);
            server::run(settings, &host, port).await
        }
        Command::Tree => commands::tree(settings).await,
        Command::Branches => commands::branches(settings).await,
        Command::Read { paths } => commands::read(settings, &paths).await,
        Command::Update { branch } => commands::update(settings, branch).await,
    }
}

fn setup_tracing() {
    use tracing_subscriber::fmt;

    // stdout carries command output, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
