//! Auth types

use crate::config::TapConfig;
use crate::types::StringMap;
use reqwest::RequestBuilder;

/// Header carrying the access token on data requests
pub const ACCESS_TOKEN_HEADER: &str = "ACCESS-TOKEN";

/// Header carrying the tenant domain on data requests
pub const DOMAIN_HEADER: &str = "x-greythr-domain";

/// Long-lived API credentials
#[derive(Clone)]
pub struct Credentials {
    /// Token exchange URL on the tenant domain
    pub token_url: String,
    /// Tenant host sent in `x-greythr-domain`
    pub domain: String,
    /// API user
    pub username: String,
    /// API password
    pub password: String,
}

impl From<&TapConfig> for Credentials {
    fn from(config: &TapConfig) -> Self {
        Self {
            token_url: config.token_url(),
            domain: config.domain_host().to_string(),
            username: config.api_username.clone(),
            password: config.api_password.clone(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token_url", &self.token_url)
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

/// Header set attached to every data request after a successful exchange
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    /// Short-lived access token
    pub access_token: String,
    /// Tenant host
    pub domain: String,
}

impl AuthHeaders {
    /// Create a header set
    pub fn new(access_token: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            domain: domain.into(),
        }
    }

    /// Headers as a plain map
    pub fn to_map(&self) -> StringMap {
        let mut headers = StringMap::new();
        headers.insert(ACCESS_TOKEN_HEADER.to_string(), self.access_token.clone());
        headers.insert(DOMAIN_HEADER.to_string(), self.domain.clone());
        headers
    }

    /// Attach the headers to a request
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(ACCESS_TOKEN_HEADER, self.access_token.as_str())
            .header(DOMAIN_HEADER, self.domain.as_str())
    }
}

impl std::fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeaders")
            .field("access_token", &"<redacted>")
            .field("domain", &self.domain)
            .finish()
    }
}
