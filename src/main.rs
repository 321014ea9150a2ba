use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use feature_proxy::config::{self, ProxyConfig};
use feature_proxy::lifecycle::{shutdown_on_signal, Shutdown};
use feature_proxy::observability::{logging, metrics};
use feature_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "feature-proxy")]
#[command(version, about = "JSON proxy for GeoServer WFS feature layers", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        config::validation::validate_config(&config).map_err(config::ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);

    tracing::info!("feature-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        report_area = %config.endpoints.report_area.layer,
        breadcrumb_summit = %config.endpoints.breadcrumb_summit.layer,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown));

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
