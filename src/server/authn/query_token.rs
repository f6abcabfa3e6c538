use anyhow::Result;

use crate::server::request::ForwardedRequest;

use super::{Authenticator, AuthnResponse};

/// Reads the credential from a query parameter of the forwarded URI.
pub struct QueryTokenAuthenticator {
    param: String,
}

impl QueryTokenAuthenticator {
    pub fn new(param: String) -> Self {
        Self { param }
    }
}

impl Authenticator for QueryTokenAuthenticator {
    fn authenticate_request(&self, req: &ForwardedRequest) -> Result<AuthnResponse> {
        match req.query_value(&self.param) {
            Some(token) if !token.is_empty() => Ok(AuthnResponse::Ok(token.to_string())),
            _ => Ok(AuthnResponse::Continue),
        }
    }
}
