// Microsoft Graph probes
// Read-only calls whose only interest is the status code

use reqwest::{Client, StatusCode};

/// Graph endpoints probed on every run, relative to the Graph base URL
pub const GRAPH_PROBE_PATHS: [&str; 4] = [
    "/me/drive/root",
    "/me/messages",
    "/me/mailFolders",
    "/me/outlook/masterCategories",
];

/// Full probe URLs for a Graph base URL such as `https://graph.microsoft.com/v1.0`
pub fn graph_endpoints(base_url: &str) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    GRAPH_PROBE_PATHS
        .iter()
        .map(|path| format!("{}{}", base, path))
        .collect()
}

/// Result of a single probe
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// HTTP 200
    Success,
    /// Any other HTTP status
    Failed { status: u16 },
    /// No response at all
    Error { message: String },
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub endpoint: String,
    pub outcome: ProbeOutcome,
}

/// Aggregated probe results, in call order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeReport {
    pub results: Vec<ProbeResult>,
}

impl ProbeReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }
}

/// Call every endpoint once with the access token
///
/// Failures are logged and counted; they never stop the loop or surface
/// as errors.
pub async fn probe<S: AsRef<str>>(
    client: &Client,
    access_token: &str,
    endpoints: &[S],
) -> ProbeReport {
    let total = endpoints.len();
    let mut report = ProbeReport::default();

    for (i, endpoint) in endpoints.iter().enumerate() {
        let endpoint = endpoint.as_ref();
        let outcome = probe_one(client, access_token, endpoint).await;
        let n = i + 1;

        match &outcome {
            ProbeOutcome::Success => {
                tracing::info!("  - Call {}/{} succeeded (Status: 200 OK)", n, total)
            }
            ProbeOutcome::Failed { status } => {
                tracing::warn!("  - Call {}/{} FAILED (Status: {})", n, total, status)
            }
            ProbeOutcome::Error { message } => {
                tracing::warn!("  - Call {}/{} FAILED with error: {}", n, total, message)
            }
        }
        tracing::debug!(endpoint = %endpoint, outcome = ?outcome, "Probe finished");

        report.results.push(ProbeResult {
            endpoint: endpoint.to_string(),
            outcome,
        });
    }

    report
}

async fn probe_one(client: &Client, access_token: &str, endpoint: &str) -> ProbeOutcome {
    let result = client
        .get(endpoint)
        .bearer_auth(access_token)
        .header("Content-Type", "application/json")
        .send()
        .await;

    match result {
        Ok(response) if response.status() == StatusCode::OK => ProbeOutcome::Success,
        Ok(response) => ProbeOutcome::Failed {
            status: response.status().as_u16(),
        },
        Err(e) => ProbeOutcome::Error {
            message: e.to_string(),
        },
    }
}
