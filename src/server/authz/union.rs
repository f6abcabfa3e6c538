use anyhow::Result;

use super::bypass::MetadataAuthorizer;
use super::topic::TopicAuthorizer;
use super::{Authorizer, AuthzRequest, AuthzResponse};

pub enum UnionAuthorizer {
    Metadata(MetadataAuthorizer),
    Topic(TopicAuthorizer),
}

impl Authorizer for UnionAuthorizer {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse> {
        match self {
            UnionAuthorizer::Metadata(a) => a.authorize_request(req),
            UnionAuthorizer::Topic(a) => a.authorize_request(req),
        }
    }
}
