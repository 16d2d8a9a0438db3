use anyhow::{Context, Result};
use std::process::ExitCode;

use graph_keepalive::config::{CliArgs, Config};
use graph_keepalive::job;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::load();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    print_startup_banner(&args);

    // Credentials are checked before any file or network access
    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Error: {}", e);
            tracing::error!("Make sure CLIENT_ID, CLIENT_SECRET and REFRESH_TOKEN are set");
            return ExitCode::from(e.exit_code());
        }
    };

    match job::run(&config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("❌ {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initialize logging; RUST_LOG wins over the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level.to_lowercase()))
        .with_context(|| format!("Invalid log level: {}", log_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize logging")
}

/// Print startup banner
fn print_startup_banner(args: &CliArgs) {
    println!();
    println!("  Graph Keepalive {}", env!("CARGO_PKG_VERSION"));
    println!("  Token file:  {}", args.token_file);
    println!("  Token URL:   {}", args.token_url);
    println!("  Graph API:   {}", args.graph_base_url);
    println!("  Log Level:   {}", args.log_level);
    println!();
}
