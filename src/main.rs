//! storefront-gate server binary

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use storefront_gate::server;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Role-based access gate for the storefront")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(
        short,
        long,
        env = "STOREFRONT_CONFIG",
        default_value = "config/storefront.yaml"
    )]
    config: PathBuf,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);
    if args.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match server::builder::run_server(&args.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
