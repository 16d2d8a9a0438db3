// Authentication types

use serde::Deserialize;
use std::fmt;

/// Client identity and the seed refresh token, read once at startup
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    /// Only used to seed the token file on first run
    pub initial_refresh_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("initial_refresh_token", &"<redacted>")
            .finish()
    }
}

/// Tokens issued by a 200 refresh grant response
///
/// Either half may be missing; the caller persists whatever refresh token
/// arrived before deciding whether the response is usable.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPair {
    pub access_token: Option<String>,
    /// The provider rotates refresh tokens, but may omit one
    pub refresh_token: Option<String>,
}

/// Token endpoint response for `grant_type=refresh_token`
#[derive(Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
}

/// OAuth2 error body returned with non-200 responses
#[derive(Deserialize)]
pub struct OAuthErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}
