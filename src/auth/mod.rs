//! Authentication module
//!
//! greytHR uses a two-step scheme: the API user's credentials are sent once
//! with HTTP Basic auth to the tenant's client-token endpoint, and the
//! returned access token is then attached to every data request together
//! with the tenant domain.
//!
//! Tokens are not cached or refreshed. Each stream performs its own
//! exchange when it starts.

mod authenticator;
mod types;

pub use authenticator::{basic_credentials, Authenticator};
pub use types::{AuthHeaders, Credentials, ACCESS_TOKEN_HEADER, DOMAIN_HEADER};
