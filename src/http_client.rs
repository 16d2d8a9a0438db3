use reqwest::Client;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};

/// Create the HTTP client shared by the token rotation and the probes
///
/// A timeout of 0 leaves that timeout unset, so a stalled endpoint blocks
/// until the peer gives up.
pub fn build_client(connect_timeout: u64, request_timeout: u64) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    if let Some(timeout) = timeout_from_secs(connect_timeout) {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(timeout) = timeout_from_secs(request_timeout) {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(Error::HttpClient)
}

/// Create the HTTP client from configuration
pub fn from_config(config: &Config) -> Result<Client> {
    build_client(config.http_connect_timeout, config.http_request_timeout)
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_disables_timeout() {
        assert_eq!(timeout_from_secs(0), None);
        assert_eq!(timeout_from_secs(30), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(0, 0).is_ok());
        assert!(build_client(10, 60).is_ok());
    }
}
