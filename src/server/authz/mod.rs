mod bypass;
mod topic;
mod union;

pub mod chain;
pub mod config;
pub mod factory;
pub mod resolver;

use anyhow::Result;

pub trait Authorizer: Send + Sync {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse>;
}

#[derive(Debug, Clone)]
pub struct AuthzRequest {
    /// Path of the forwarded URI, without the query string
    pub path: String,
    /// Forwarded method, compared case-sensitively
    pub method: String,
    /// Credential found by the authenticators
    pub credential: Option<String>,
}

/// Possible responses from an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzResponse {
    /// Nothing guards the resource
    Open,
    /// The credential belongs to the resolved topic
    Granted(String),
    /// The resolved topic is protected but no credential was offered
    MissingKey(String),
    /// The credential does not belong to the resolved topic
    Denied(String),
    /// Defers decision to next authorizer in chain
    Continue,
}
