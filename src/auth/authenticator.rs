//! Authenticator implementation
//!
//! Performs the client-token exchange and builds the header set for data
//! requests.

use super::types::{AuthHeaders, Credentials};
use crate::error::{Error, Result};
use base64::Engine as _;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

/// Exchanges API credentials for an access token
pub struct Authenticator {
    credentials: Credentials,
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator with its own HTTP client
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            http_client: Client::new(),
        }
    }

    /// Create an authenticator sharing an existing HTTP client
    pub fn with_client(credentials: Credentials, http_client: Client) -> Self {
        Self {
            credentials,
            http_client,
        }
    }

    /// The credentials in use
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Perform one token exchange.
    ///
    /// Any non-2xx answer is fatal; there is no retry.
    pub async fn authenticate(&self) -> Result<AuthHeaders> {
        let creds = &self.credentials;
        debug!("Requesting access token from {}", creds.token_url);

        let response = self
            .http_client
            .post(&creds.token_url)
            .header(
                AUTHORIZATION,
                format!(
                    "Basic {}",
                    basic_credentials(&creds.username, &creds.password)
                ),
            )
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::auth(format!(
                "Token request failed with status {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::auth(format!("Invalid token response: {e}")))?;

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::auth("Token response has no access_token"))?;

        info!("Obtained access token for {}", creds.domain);
        Ok(AuthHeaders::new(access_token, creds.domain.clone()))
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Client-token response body
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// `base64(username:password)` for the Basic authorization header
pub fn basic_credentials(username: &str, password: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"))
}
