mod bearer_token;
mod query_token;
mod union;

pub mod chain;
pub mod config;
pub mod factory;

use anyhow::Result;

use super::request::ForwardedRequest;

/// Finds the credential a request offers. Authenticators do not judge the
/// credential, that is left to the authorizers which know the topic.
pub trait Authenticator: Send + Sync {
    fn authenticate_request(&self, req: &ForwardedRequest) -> Result<AuthnResponse>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthnResponse {
    /// A credential was found
    Ok(String),
    /// This source offers nothing, try the next one
    Continue,
}
