use anyhow::Result;

use crate::server::request::ForwardedRequest;

use super::bearer_token::BearerTokenAuthenticator;
use super::query_token::QueryTokenAuthenticator;
use super::{Authenticator, AuthnResponse};

pub enum UnionAuthenticator {
    QueryToken(QueryTokenAuthenticator),
    BearerToken(BearerTokenAuthenticator),
}

impl Authenticator for UnionAuthenticator {
    fn authenticate_request(&self, req: &ForwardedRequest) -> Result<AuthnResponse> {
        match self {
            UnionAuthenticator::QueryToken(auth) => auth.authenticate_request(req),
            UnionAuthenticator::BearerToken(auth) => auth.authenticate_request(req),
        }
    }
}
