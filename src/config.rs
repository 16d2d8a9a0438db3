use clap::Parser;
use std::path::PathBuf;

use crate::auth::Credentials;
use crate::error::{Error, Result};

/// Microsoft identity platform token endpoint (multi-tenant)
pub const DEFAULT_TOKEN_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/token";

/// Redirect URI registered for the app when the refresh token was issued
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:53682/";

/// Microsoft Graph v1.0 base URL
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Graph Keepalive - rotate a Microsoft refresh token and probe Microsoft Graph
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Application (client) ID
    #[arg(long, env = "CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Application client secret
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Refresh token used to seed the token file on first run
    #[arg(long, env = "REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// File holding the most recently issued refresh token
    #[arg(short = 'f', long, env = "TOKEN_FILE", default_value = "Secret.txt")]
    pub token_file: String,

    /// OAuth2 token endpoint
    #[arg(long, env = "TOKEN_URL", default_value = DEFAULT_TOKEN_URL)]
    pub token_url: String,

    /// Redirect URI sent with the refresh grant
    #[arg(long, env = "REDIRECT_URI", default_value = DEFAULT_REDIRECT_URI)]
    pub redirect_uri: String,

    /// Microsoft Graph base URL
    #[arg(long, env = "GRAPH_BASE_URL", default_value = DEFAULT_GRAPH_BASE_URL)]
    pub graph_base_url: String,

    /// HTTP connect timeout in seconds (0 disables it)
    #[arg(long, env = "HTTP_CONNECT_TIMEOUT", default_value = "0")]
    pub connect_timeout: u64,

    /// HTTP request timeout in seconds (0 disables it)
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "0")]
    pub http_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl CliArgs {
    /// Parse CLI arguments after loading a `.env` file if one exists
    ///
    /// Priority: CLI > ENV > .env > defaults. Variables already present in
    /// the environment win over `.env`.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        CliArgs::parse()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    // Credentials
    pub credentials: Credentials,

    // Persisted refresh token
    pub token_file: PathBuf,

    // Endpoints
    pub token_url: String,
    pub redirect_uri: String,
    pub graph_base_url: String,

    // HTTP client
    pub http_connect_timeout: u64,
    pub http_request_timeout: u64,
}

impl Config {
    /// Build the configuration from parsed arguments
    ///
    /// Fails with every missing credential listed, before anything touches
    /// the network or the filesystem.
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let client_id = non_empty(args.client_id);
        let client_secret = non_empty(args.client_secret);
        let refresh_token = non_empty(args.refresh_token);

        let credentials = match (client_id, client_secret, refresh_token) {
            (Some(client_id), Some(client_secret), Some(initial_refresh_token)) => Credentials {
                client_id,
                client_secret,
                initial_refresh_token,
            },
            (client_id, client_secret, refresh_token) => {
                let missing = [
                    ("CLIENT_ID", client_id.is_none()),
                    ("CLIENT_SECRET", client_secret.is_none()),
                    ("REFRESH_TOKEN", refresh_token.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();
                return Err(Error::MissingCredentials(missing));
            }
        };

        Ok(Config {
            credentials,
            token_file: expand_tilde(&args.token_file),
            token_url: args.token_url,
            redirect_uri: args.redirect_uri,
            graph_base_url: args.graph_base_url.trim_end_matches('/').to_string(),
            http_connect_timeout: args.connect_timeout,
            http_request_timeout: args.http_timeout,
        })
    }
}

/// Treat blank values the same as absent ones
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
