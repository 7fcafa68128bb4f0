//! Matchcast - realtime fan-out relay
//!
//! Main entry point. `run` starts the relay (bus subscriber + WebSocket
//! server); `publish` puts a test event on the bus.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use matchcast_api::{AppState, RelayServer};
use matchcast_config::{Config, ConfigLoader};
use matchcast_relay::{BusSubscriber, ConnectionRegistry, EventPublisher};

/// Matchcast CLI.
#[derive(Parser)]
#[command(name = "matchcast")]
#[command(about = "Realtime fan-out relay for the matchday event app")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay in foreground (default)
    Run {
        /// Server host override
        #[arg(long)]
        host: Option<String>,

        /// Server port override
        #[arg(long)]
        port: Option<u16>,
    },

    /// Publish a test event onto the bus
    Publish {
        /// Topic to publish on
        #[arg(long, default_value = "events-updates")]
        topic: String,

        /// JSON payload
        message: String,
    },
}

/// Initialize tracing with console output.
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

/// Load configuration, falling back to defaults if the file is absent.
fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(ConfigLoader::load(path)?)
    } else {
        info!("No config file at {}, using defaults", path.display());
        Ok(Config::default())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;

    match cli.command {
        None => run_relay(config).await,
        Some(Commands::Run { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_relay(config).await
        }
        Some(Commands::Publish { topic, message }) => {
            publish_event(config, &topic, &message).await
        }
    }
}

/// Run the relay in foreground.
async fn run_relay(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting matchcast v{}", env!("CARGO_PKG_VERSION"));

    let registry = Arc::new(ConnectionRegistry::new());

    // Subscription failure here is fatal: exit nonzero rather than run
    // with no event source, so process supervision restarts us.
    let subscriber = BusSubscriber::connect(&config.bus, registry.clone()).await?;

    let state = Arc::new(AppState::new(registry));
    let server = RelayServer::new(config.server, state);

    info!("Matchcast ready:");
    info!("  WebSocket: ws://{}/ws", server.addr());
    info!("  Health:    http://{}/health", server.addr());

    tokio::select! {
        result = subscriber.run() => {
            error!("Bus subscription ended");
            result?;
        }
        result = server.run() => {
            result?;
        }
    }

    Ok(())
}

/// Publish a single event, then exit.
async fn publish_event(
    config: Config,
    topic: &str,
    message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let data: serde_json::Value = serde_json::from_str(message)?;

    let mut publisher = EventPublisher::connect(&config.bus).await?;
    publisher.publish(topic, &data).await?;

    info!("Published to {}", topic);
    Ok(())
}
