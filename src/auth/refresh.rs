// Token refresh logic

use reqwest::{Client, StatusCode};

use super::types::{Credentials, OAuthErrorResponse, RefreshTokenResponse, TokenPair};
use crate::error::{Error, Result};

/// Exchange a refresh token for a new token pair
///
/// Sends a form-encoded `grant_type=refresh_token` request. Anything but
/// 200 is an error; there is no retry. Empty token fields come back as
/// `None`.
pub async fn request_token_pair(
    client: &Client,
    token_url: &str,
    credentials: &Credentials,
    refresh_token: &str,
    redirect_uri: &str,
) -> Result<TokenPair> {
    tracing::info!("🔄 Requesting a new token from the identity provider...");
    tracing::debug!(
        "Refresh request: url={}, client_id={}...",
        token_url,
        credentials.client_id.chars().take(8).collect::<String>()
    );

    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("redirect_uri", redirect_uri),
    ];

    let response = client
        .post(token_url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .form(&form)
        .send()
        .await
        .map_err(Error::TokenRequest)?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            "🔥 Failed to get a new token. Status: {}, Body: {}",
            status.as_u16(),
            body
        );

        if let Ok(oauth_error) = serde_json::from_str::<OAuthErrorResponse>(&body) {
            tracing::error!(
                "OAuth error details: error={}, description={}",
                oauth_error.error,
                oauth_error.error_description.as_deref().unwrap_or("-")
            );
        }

        return Err(Error::TokenRefresh {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await.map_err(Error::TokenRequest)?;
    let data: RefreshTokenResponse = serde_json::from_str(&body)
        .map_err(|e| Error::InvalidTokenResponse(format!("malformed JSON: {}", e)))?;

    tracing::debug!(
        "Token response: token_type={}, expires_in={}, scope={}",
        data.token_type.as_deref().unwrap_or("-"),
        data.expires_in.map(|s| s.to_string()).as_deref().unwrap_or("-"),
        data.scope.as_deref().unwrap_or("-")
    );

    Ok(TokenPair {
        access_token: data.access_token.filter(|t| !t.is_empty()),
        refresh_token: data.refresh_token.filter(|t| !t.is_empty()),
    })
}
