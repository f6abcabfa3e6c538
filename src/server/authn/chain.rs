use anyhow::Result;

use crate::server::request::ForwardedRequest;

use super::union::UnionAuthenticator;
use super::{Authenticator, AuthnResponse};

/// Asks each credential source in order, the first one that finds a
/// credential wins.
pub struct ChainAuthenticator {
    pub(super) authenticators: Vec<UnionAuthenticator>,
}

impl ChainAuthenticator {
    pub fn new(authenticators: Vec<UnionAuthenticator>) -> Self {
        Self { authenticators }
    }
}

impl Authenticator for ChainAuthenticator {
    fn authenticate_request(&self, req: &ForwardedRequest) -> Result<AuthnResponse> {
        for authenticator in self.authenticators.iter() {
            match authenticator.authenticate_request(req)? {
                AuthnResponse::Ok(token) => return Ok(AuthnResponse::Ok(token)),
                AuthnResponse::Continue => continue,
            }
        }
        Ok(AuthnResponse::Continue)
    }
}
