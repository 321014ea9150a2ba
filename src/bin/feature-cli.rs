use clap::{Parser, Subcommand};
use serde_json::Value;

use feature_proxy::wfs::FeatureCollection;

#[derive(Parser)]
#[command(name = "feature-cli")]
#[command(about = "Query a running feature proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    /// Print only the feature count instead of the full document.
    #[arg(short, long)]
    summary: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check proxy liveness
    Health,
    /// Fetch the report area layer
    ReportArea,
    /// Fetch the breadcrumb summit layer
    BreadcrumbSummit,
}

impl Commands {
    fn path(&self) -> &'static str {
        match self {
            Commands::Health => "/health",
            Commands::ReportArea => "/api/reportarea_atco",
            Commands::BreadcrumbSummit => "/api/breadcrumb_summit",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let url = format!("{}{}", cli.url.trim_end_matches('/'), cli.command.path());
    let res = client.get(url).send().await?;

    let status = res.status();
    let body: Value = res.json().await?;

    if !status.is_success() {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        eprintln!("Error: proxy returned status {}: {}", status, message);
        std::process::exit(1);
    }

    if cli.summary && !matches!(cli.command, Commands::Health) {
        let count = FeatureCollection::from(body).feature_count();
        println!("{} features", count);
    } else {
        println!("{}", serde_json::to_string_pretty(&body)?);
    }

    Ok(())
}
