use anyhow::Result;
use clap::Parser;
use smartctl_exporter::{config::Config, server};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Address to listen on
    #[arg(short, long, env = "SMARTCTL_EXPORTER_ADDRESS")]
    address: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SMARTCTL_EXPORTER_PORT")]
    port: Option<u16>,

    /// Refresh interval in seconds
    #[arg(short, long, env = "SMARTCTL_REFRESH_INTERVAL")]
    interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first so --version and --help never touch logging
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting smartctl Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Flags and their environment variables override the file
    if let Some(address) = args.address {
        config.server.addr = address;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(interval) = args.interval {
        config.metrics.refresh_interval_seconds = interval;
    }
    config.validate()?;

    info!("Configuration loaded successfully");
    info!(
        "Refresh interval: {}s, smartctl binary: {}",
        config.metrics.refresh_interval_seconds, config.smartctl.binary
    );

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
