use anyhow::Result;

use crate::server::request::ForwardedRequest;

use super::{Authenticator, AuthnResponse};

/// Reads the credential from an `Authorization: Bearer <token>` header. The
/// marker is case-sensitive and must be one of the whitespace separated
/// fields; the last field is the token.
pub struct BearerTokenAuthenticator;

impl BearerTokenAuthenticator {
    const MARKER: &'static str = "Bearer";

    pub fn new() -> Self {
        Self
    }
}

impl Authenticator for BearerTokenAuthenticator {
    fn authenticate_request(&self, req: &ForwardedRequest) -> Result<AuthnResponse> {
        let auth = match req.auth_header {
            Some(ref auth) => auth.trim(),
            None => return Ok(AuthnResponse::Continue),
        };
        if auth.is_empty() {
            return Ok(AuthnResponse::Continue);
        }

        let fields: Vec<&str> = auth.split_whitespace().collect();
        if !fields.contains(&Self::MARKER) {
            return Ok(AuthnResponse::Continue);
        }

        match fields.last() {
            Some(token) if *token != Self::MARKER => Ok(AuthnResponse::Ok(token.to_string())),
            _ => Ok(AuthnResponse::Continue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(header: Option<&str>) -> AuthnResponse {
        let req = ForwardedRequest::parse("/", "GET", header.map(String::from));
        BearerTokenAuthenticator::new().authenticate_request(&req).unwrap()
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(extract(Some("Bearer t1")), AuthnResponse::Ok(String::from("t1")));
        assert_eq!(extract(Some("  Bearer   t1  ")), AuthnResponse::Ok(String::from("t1")));

        assert_eq!(extract(None), AuthnResponse::Continue);
        assert_eq!(extract(Some("")), AuthnResponse::Continue);
        assert_eq!(extract(Some("   ")), AuthnResponse::Continue);
        assert_eq!(extract(Some("Bearer")), AuthnResponse::Continue);
        assert_eq!(extract(Some("Bearer  ")), AuthnResponse::Continue);

        // Case-sensitive marker
        assert_eq!(extract(Some("bearer t1")), AuthnResponse::Continue);
        assert_eq!(extract(Some("BEARER t1")), AuthnResponse::Continue);
        assert_eq!(extract(Some("Basic dXNlcjpwYXNz")), AuthnResponse::Continue);
        assert_eq!(extract(Some("t1")), AuthnResponse::Continue);
    }
}
