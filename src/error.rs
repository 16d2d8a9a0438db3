// Error handling module
// Defines the fatal error taxonomy and its mapping to process exit codes

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a run
///
/// Probe failures are not represented here: they are counted in the
/// probe report and never stop the job.
#[derive(Error, Debug)]
pub enum Error {
    /// One or more required environment variables are absent or empty
    #[error("Missing required credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    /// Reading or writing the persisted refresh token failed
    #[error("Token file error ({}): {source}", path.display())]
    TokenStore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted token file exists but holds no token
    #[error("Token file is empty: {}", .0.display())]
    EmptyTokenFile(PathBuf),

    /// The HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The token request never produced a response
    #[error("Token request failed: {0}")]
    TokenRequest(#[source] reqwest::Error),

    /// The token endpoint answered with a non-200 status
    #[error("Token refresh failed: {status} - {body}")]
    TokenRefresh { status: u16, body: String },

    /// The token endpoint answered 200 with an unusable body
    #[error("Invalid token response: {0}")]
    InvalidTokenResponse(String),
}

impl Error {
    /// Process exit code for this error
    ///
    /// Every fatal error currently exits with 1; the match keeps the
    /// mapping explicit when new variants are added.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::MissingCredentials(_)
            | Error::TokenStore { .. }
            | Error::EmptyTokenFile(_)
            | Error::HttpClient(_)
            | Error::TokenRequest(_)
            | Error::TokenRefresh { .. }
            | Error::InvalidTokenResponse(_) => 1,
        }
    }
}

/// Result type alias for job operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_message() {
        let err = Error::MissingCredentials(vec!["CLIENT_ID", "REFRESH_TOKEN"]);
        assert_eq!(
            err.to_string(),
            "Missing required credentials: CLIENT_ID, REFRESH_TOKEN"
        );
    }

    #[test]
    fn test_token_refresh_message() {
        let err = Error::TokenRefresh {
            status: 401,
            body: "invalid_grant".to_string(),
        };
        assert_eq!(err.to_string(), "Token refresh failed: 401 - invalid_grant");
    }

    #[test]
    fn test_token_store_message() {
        let err = Error::TokenStore {
            path: PathBuf::from("Secret.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Token file error (Secret.txt): denied");
    }

    #[test]
    fn test_empty_token_file_message() {
        let err = Error::EmptyTokenFile(PathBuf::from("/tmp/Secret.txt"));
        assert_eq!(err.to_string(), "Token file is empty: /tmp/Secret.txt");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::MissingCredentials(vec!["CLIENT_ID"]).exit_code(), 1);
        assert_eq!(
            Error::TokenRefresh {
                status: 400,
                body: String::new()
            }
            .exit_code(),
            1
        );
        assert_eq!(
            Error::InvalidTokenResponse("no access_token".to_string()).exit_code(),
            1
        );
        assert_eq!(Error::EmptyTokenFile(PathBuf::from("x")).exit_code(), 1);
    }
}
