use log::warn;

use super::bearer_token::BearerTokenAuthenticator;
use super::chain::ChainAuthenticator;
use super::config::AuthnConfig;
use super::query_token::QueryTokenAuthenticator;
use super::union::UnionAuthenticator;

/// Builds the credential extraction chain:
/// 1. Query parameter token (always enabled)
/// 2. Bearer token header (if enabled in config)
pub struct AuthnFactory;

impl AuthnFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_authenticator(&self, cfg: &AuthnConfig) -> ChainAuthenticator {
        let mut authenticators = Vec::new();

        let query_auth = QueryTokenAuthenticator::new(cfg.query_param.clone());
        authenticators.push(UnionAuthenticator::QueryToken(query_auth));

        if cfg.bearer {
            authenticators.push(UnionAuthenticator::BearerToken(
                BearerTokenAuthenticator::new(),
            ));
        } else {
            warn!("Bearer token authentication disabled, only the query parameter is accepted");
        }

        ChainAuthenticator::new(authenticators)
    }
}
