use std::collections::HashSet;

use anyhow::Result;
use log::{debug, info};
use thiserror::Error;

use super::cache::Cache;
use super::{Database, Transaction};

/// Reasons an administrative write is rejected before touching the store.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("topic is required")]
    EmptyTopic,

    #[error("token is required")]
    EmptyToken,
}

impl InvalidInput {
    pub fn check_create(topic: &str, token: &str) -> Result<(), Self> {
        if topic.is_empty() {
            return Err(Self::EmptyTopic);
        }
        if token.is_empty() {
            return Err(Self::EmptyToken);
        }
        Ok(())
    }

    pub fn check_delete(topic: &str) -> Result<(), Self> {
        if topic.is_empty() {
            return Err(Self::EmptyTopic);
        }
        Ok(())
    }
}

impl Database {
    /// Adds `token` to the set of `topic`, creating the topic entry when absent.
    ///
    /// Returns `false` when the topic or the token is empty. Re-adding an existing
    /// token succeeds without changing anything.
    pub fn create_token(&self, topic: &str, token: &str) -> Result<bool> {
        if let Err(e) = InvalidInput::check_create(topic, token) {
            debug!("Reject create token for '{topic}': {e}");
            return Ok(false);
        }

        self.with_transaction(|tx, cache| {
            tx.add_token(topic, token)?;
            invalidate(cache, topic)
        })?;

        info!("Access token created for '{topic}'");
        Ok(true)
    }

    /// Removes `token` from `topic`, or the whole topic entry when `token` is
    /// `None` (an empty token counts as `None`). The topic becomes open once its
    /// last token is gone.
    ///
    /// Returns `false` only when the topic is empty; deleting something that does
    /// not exist is not an error.
    pub fn delete_token(&self, topic: &str, token: Option<&str>) -> Result<bool> {
        if let Err(e) = InvalidInput::check_delete(topic) {
            debug!("Reject delete token for '{topic}': {e}");
            return Ok(false);
        }
        let token = token.filter(|t| !t.is_empty());

        self.with_transaction(|tx, cache| {
            match token {
                Some(token) => tx.remove_token(topic, token)?,
                None => tx.remove_topic(topic)?,
            }
            invalidate(cache, topic)
        })?;

        match token {
            Some(_) => info!("Access token deleted for '{topic}'"),
            None => info!("All access tokens deleted for '{topic}'"),
        }
        Ok(true)
    }

    /// A topic is open when it has no entry (or an empty token set).
    pub fn is_resource_open(&self, topic: &str) -> Result<bool> {
        let tokens = self.with_transaction(|tx, cache| load_tokens(tx, cache, topic))?;
        Ok(tokens.is_empty())
    }

    /// Whether `token` is a member of the token set of `topic`. Always `false`
    /// for open topics.
    pub fn is_token_authorized(&self, topic: &str, token: &str) -> Result<bool> {
        let tokens = self.with_transaction(|tx, cache| load_tokens(tx, cache, topic))?;
        Ok(tokens.contains(token))
    }

    /// All currently protected topics, sorted.
    pub fn list_topics(&self) -> Result<Vec<String>> {
        self.with_transaction(|tx, cache| {
            if let Some(topics) = cache.list_topics()? {
                return Ok(topics);
            }

            let topics = tx.list_topics()?;
            cache.save_topics(topics.clone())?;
            Ok(topics)
        })
    }
}

fn load_tokens(tx: &dyn Transaction, cache: &dyn Cache, topic: &str) -> Result<HashSet<String>> {
    if let Some(tokens) = cache.get_tokens(topic)? {
        return Ok(tokens);
    }

    let tokens = tx.get_tokens(topic)?;
    // Only protected topics are cached, lookups of arbitrary open names must not
    // grow the cache.
    if !tokens.is_empty() {
        cache.save_tokens(topic, tokens.clone())?;
    }
    Ok(tokens)
}

fn invalidate(cache: &dyn Cache, topic: &str) -> Result<()> {
    cache.delete_tokens(topic)?;
    cache.clear_topics()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input() {
        assert_eq!(InvalidInput::check_create("", "t"), Err(InvalidInput::EmptyTopic));
        assert_eq!(InvalidInput::check_create("", ""), Err(InvalidInput::EmptyTopic));
        assert_eq!(InvalidInput::check_create("a", ""), Err(InvalidInput::EmptyToken));
        assert_eq!(InvalidInput::check_create("a", "t"), Ok(()));

        assert_eq!(InvalidInput::check_delete(""), Err(InvalidInput::EmptyTopic));
        assert_eq!(InvalidInput::check_delete("a"), Ok(()));

        assert_eq!(InvalidInput::EmptyTopic.to_string(), "topic is required");
        assert_eq!(InvalidInput::EmptyToken.to_string(), "token is required");
    }

    #[test]
    fn test_cache_follows_writes() {
        let db = Database::new_test();

        // Fill the cache
        assert!(db.create_token("admin", "k1").unwrap());
        assert!(db.is_token_authorized("admin", "k1").unwrap());
        assert_eq!(db.list_topics().unwrap(), vec!["admin"]);

        assert!(db.create_token("admin", "k2").unwrap());
        assert!(db.is_token_authorized("admin", "k2").unwrap());

        assert!(db.delete_token("admin", Some("k1")).unwrap());
        assert!(!db.is_token_authorized("admin", "k1").unwrap());
        assert!(db.is_token_authorized("admin", "k2").unwrap());

        assert!(db.delete_token("admin", None).unwrap());
        assert!(db.is_resource_open("admin").unwrap());
        assert!(!db.is_token_authorized("admin", "k2").unwrap());
        assert!(db.list_topics().unwrap().is_empty());
    }
}
