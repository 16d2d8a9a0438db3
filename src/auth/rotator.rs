use reqwest::Client;

use super::refresh;
use super::store::{Seeded, TokenStore};
use super::types::Credentials;
use crate::config::Config;
use crate::error::{Error, Result};

/// Token rotator
/// Exchanges the persisted refresh token and writes the new one back
/// before handing out the access token
pub struct TokenRotator {
    /// HTTP client for refresh requests
    client: Client,

    /// Client identity and seed token
    credentials: Credentials,

    /// Persisted refresh token
    store: TokenStore,

    /// OAuth2 token endpoint
    token_url: String,

    /// Redirect URI sent with every refresh grant
    redirect_uri: String,
}

impl TokenRotator {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            credentials: config.credentials.clone(),
            store: TokenStore::new(&config.token_file),
            token_url: config.token_url.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    /// Seed the token file from the initial refresh token on first run
    ///
    /// An existing file always wins over the environment value.
    pub fn bootstrap(&self) -> Result<Seeded> {
        let seeded = self
            .store
            .ensure_seeded(&self.credentials.initial_refresh_token)?;

        match seeded {
            Seeded::Created => tracing::info!(
                "📄 Token file '{}' not found, created it from REFRESH_TOKEN",
                self.store.path().display()
            ),
            Seeded::Existing => tracing::debug!(
                "Using refresh token from '{}'",
                self.store.path().display()
            ),
        }

        Ok(seeded)
    }

    /// Exchange `refresh_token` for a new token pair
    ///
    /// Any refresh token in a 200 response is persisted first, even when
    /// the access token is missing, since the provider has already consumed
    /// the old one. Other errors leave the token file as it was.
    pub async fn rotate(&self, refresh_token: &str) -> Result<String> {
        let pair = refresh::request_token_pair(
            &self.client,
            &self.token_url,
            &self.credentials,
            refresh_token,
            &self.redirect_uri,
        )
        .await?;

        match pair.refresh_token {
            Some(ref new_refresh_token) => {
                self.store.save(new_refresh_token)?;
                tracing::debug!(
                    "Saved rotated refresh token to '{}'",
                    self.store.path().display()
                );
            }
            None => tracing::warn!(
                "Token response did not include a refresh token, keeping the current one"
            ),
        }

        let access_token = pair.access_token.ok_or_else(|| {
            Error::InvalidTokenResponse("response does not contain access_token".to_string())
        })?;

        tracing::info!("✅ New token received");
        Ok(access_token)
    }

    /// Bootstrap, read the current refresh token and rotate it
    pub async fn rotate_persisted(&self) -> Result<String> {
        self.bootstrap()?;
        let current = self.store.load()?;
        self.rotate(&current).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliArgs;
    use std::fs;

    fn test_config(token_file: &std::path::Path, token_url: String) -> Config {
        Config::from_args(CliArgs {
            client_id: Some("client-id".to_string()),
            client_secret: Some("client-secret".to_string()),
            refresh_token: Some("seed-token".to_string()),
            token_file: token_file.to_string_lossy().to_string(),
            token_url,
            redirect_uri: crate::config::DEFAULT_REDIRECT_URI.to_string(),
            graph_base_url: crate::config::DEFAULT_GRAPH_BASE_URL.to_string(),
            connect_timeout: 0,
            http_timeout: 0,
            log_level: "info".to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_rotate_persists_new_refresh_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"access_token":"A1","refresh_token":"R2"}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Secret.txt");
        fs::write(&path, "R1").unwrap();

        let config = test_config(&path, format!("{}/token", server.url()));
        let rotator = TokenRotator::new(Client::new(), &config);

        let access_token = rotator.rotate("R1").await.unwrap();

        assert_eq!(access_token, "A1");
        assert_eq!(fs::read_to_string(&path).unwrap(), "R2");
    }

    #[tokio::test]
    async fn test_rotate_failure_leaves_file_untouched() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Secret.txt");
        fs::write(&path, "R1").unwrap();

        let config = test_config(&path, format!("{}/token", server.url()));
        let rotator = TokenRotator::new(Client::new(), &config);

        let err = rotator.rotate("R1").await.unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "R1");
    }

    #[tokio::test]
    async fn test_rotate_without_new_refresh_token_keeps_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"access_token":"A1"}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Secret.txt");
        fs::write(&path, "R1").unwrap();

        let config = test_config(&path, format!("{}/token", server.url()));
        let rotator = TokenRotator::new(Client::new(), &config);

        assert_eq!(rotator.rotate("R1").await.unwrap(), "A1");
        assert_eq!(fs::read_to_string(&path).unwrap(), "R1");
    }

    #[tokio::test]
    async fn test_rotate_saves_refresh_token_even_without_access_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"refresh_token":"R2"}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Secret.txt");
        fs::write(&path, "R1").unwrap();

        let config = test_config(&path, format!("{}/token", server.url()));
        let rotator = TokenRotator::new(Client::new(), &config);

        let err = rotator.rotate("R1").await.unwrap_err();

        assert!(matches!(err, Error::InvalidTokenResponse(_)));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "R2");
    }

    #[test]
    fn test_bootstrap_seeds_then_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Secret.txt");
        let config = test_config(&path, "http://127.0.0.1:9/token".to_string());
        let rotator = TokenRotator::new(Client::new(), &config);

        assert_eq!(rotator.bootstrap().unwrap(), Seeded::Created);
        assert_eq!(fs::read_to_string(&path).unwrap(), "seed-token");

        fs::write(&path, "rotated").unwrap();
        assert_eq!(rotator.bootstrap().unwrap(), Seeded::Existing);
        assert_eq!(fs::read_to_string(&path).unwrap(), "rotated");
    }
}
