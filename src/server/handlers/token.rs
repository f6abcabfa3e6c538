use std::sync::Arc;

use log::error;

use crate::server::db::Database;
use crate::server::response::{self, Response};
use crate::types::token::{AddTokenForm, RemoveTokenForm};

/// Administrative writes to the token registry.
pub struct TokenHandler {
    db: Arc<Database>,
}

impl TokenHandler {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn add_token(&self, form: AddTokenForm) -> Response {
        let topic = form.topic.unwrap_or_default();
        let token = form.token.unwrap_or_default();

        match self.db.create_token(&topic, &token) {
            Ok(true) => Response::ok(format!("Access token created for {topic}")),
            Ok(false) => {
                Response::bad_request(format!("Failed to create access token for {topic}"))
            }
            Err(e) => {
                error!("Failed to create access token for '{topic}': {e:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    pub fn remove_token(&self, form: RemoveTokenForm) -> Response {
        let topic = form.topic.unwrap_or_default();

        match self.db.delete_token(&topic, form.token.as_deref()) {
            Ok(true) => Response::ok(format!("Access token(s) deleted for {topic}")),
            Ok(false) => {
                Response::bad_request(format!("Failed to remove access token(s) for {topic}"))
            }
            Err(e) => {
                error!("Failed to remove access token(s) for '{topic}': {e:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }
}
