use std::sync::Arc;

use anyhow::Result;
use log::debug;

use crate::server::db::Database;

use super::resolver::TopicResolver;
use super::{Authorizer, AuthzRequest, AuthzResponse};

/// Checks the credential against the token set of the topic governing the
/// request path.
pub struct TopicAuthorizer {
    resolver: TopicResolver,
    db: Arc<Database>,
}

impl TopicAuthorizer {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            resolver: TopicResolver::new(db.clone()),
            db,
        }
    }
}

impl Authorizer for TopicAuthorizer {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse> {
        let topic = match self.resolver.extract_topic(&req.path)? {
            Some(topic) => topic,
            None => return Ok(AuthzResponse::Open),
        };

        // The topic may lose its last token between resolution and here
        if self.db.is_resource_open(&topic)? {
            debug!("Topic '{topic}' is open");
            return Ok(AuthzResponse::Open);
        }

        let token = match req.credential {
            Some(ref token) => token,
            None => return Ok(AuthzResponse::MissingKey(topic)),
        };

        if self.db.is_token_authorized(&topic, token)? {
            Ok(AuthzResponse::Granted(topic))
        } else {
            Ok(AuthzResponse::Denied(topic))
        }
    }
}
