use std::collections::HashSet;
use std::sync::Arc;

use log::info;

use crate::server::db::Database;

use super::bypass::MetadataAuthorizer;
use super::chain::ChainAuthorizer;
use super::config::AuthzConfig;
use super::topic::TopicAuthorizer;
use super::union::UnionAuthorizer;

pub struct AuthzFactory;

impl AuthzFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_authorizer(&self, cfg: &AuthzConfig, db: Arc<Database>) -> ChainAuthorizer {
        let mut authorizers = vec![];

        if !cfg.open_paths.is_empty() && !cfg.open_methods.is_empty() {
            let methods: HashSet<String> = cfg.open_methods.iter().cloned().collect();
            let metadata_authz = MetadataAuthorizer::new(methods, cfg.open_paths.clone());
            authorizers.push(UnionAuthorizer::Metadata(metadata_authz));
        } else {
            info!("Metadata bypass is disabled");
        }

        let topic_authz = TopicAuthorizer::new(db);
        authorizers.push(UnionAuthorizer::Topic(topic_authz));

        ChainAuthorizer::new(authorizers)
    }
}
