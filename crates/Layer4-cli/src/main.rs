//! politeia events CLI - Main entry point

mod replay;

use clap::{Parser, Subcommand};
use politeia_foundation::NotifyConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// politeia events - replay backend events through email and audit-log handlers
#[derive(Parser, Debug)]
#[command(name = "politeia-events")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (.json or .toml); defaults to global + project notify.json
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publish every event in a JSON array file and wait for handlers to finish
    Replay {
        /// JSON file containing an array of events
        events: PathBuf,

        /// JSON file with users and proposals for the record store
        #[arg(short, long)]
        fixture: Option<PathBuf>,
    },
    /// List event kinds and the handlers registered for each
    Kinds,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Replay { events, fixture } => {
            let summary = replay::run(&config, &events, fixture.as_deref()).await?;
            println!(
                "Replayed {} events ({} deliveries) through {} handlers",
                summary.events, summary.deliveries, summary.handlers
            );
        }
        Command::Kinds => {
            replay::print_kinds(&config);
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<NotifyConfig> {
    match path {
        Some(path) => Ok(NotifyConfig::from_file(path)?),
        None => Ok(NotifyConfig::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}", e);
            NotifyConfig::default()
        })),
    }
}
