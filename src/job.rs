// One run of the keepalive job: bootstrap, rotate, probe

use chrono::Local;

use crate::auth::TokenRotator;
use crate::config::Config;
use crate::error::Result;
use crate::http_client;
use crate::probe::{self, ProbeReport};

/// Run the job once
///
/// Only token file and rotation failures are returned as errors. Probe
/// outcomes end up in the report.
pub async fn run(config: &Config) -> Result<ProbeReport> {
    tracing::info!(
        "🕰️  Starting run at: {}",
        Local::now().format("%a %b %e %H:%M:%S %Y")
    );

    let client = http_client::from_config(config)?;

    let rotator = TokenRotator::new(client.clone(), config);
    let access_token = rotator.rotate_persisted().await?;
    tracing::debug!(
        "Access token: {}...",
        access_token.chars().take(20).collect::<String>()
    );

    let endpoints = probe::graph_endpoints(&config.graph_base_url);

    tracing::info!("🚀 Starting API calls...");
    let report = probe::probe(&client, &access_token, &endpoints).await;

    tracing::info!(
        "✨ Run finished. Successful calls: {}/{}",
        report.succeeded(),
        report.total()
    );

    Ok(report)
}
