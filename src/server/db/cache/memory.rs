use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use anyhow::Result;

use super::Cache;

/// A memory-based cache implementation that stores data in simple maps.
/// The cached data does not expire, writers invalidate it explicitly.
pub struct MemoryCache {
    topics: RefCell<Option<Vec<String>>>,
    tokens: RefCell<HashMap<String, HashSet<String>>>,
}

impl MemoryCache {
    /// Creates a new instance of memory cache.
    pub fn new() -> Self {
        Self {
            topics: RefCell::new(None),
            tokens: RefCell::new(HashMap::new()),
        }
    }
}

impl Cache for MemoryCache {
    fn list_topics(&self) -> Result<Option<Vec<String>>> {
        Ok(self.topics.borrow().clone())
    }

    fn save_topics(&self, topics: Vec<String>) -> Result<()> {
        self.topics.replace(Some(topics));
        Ok(())
    }

    fn clear_topics(&self) -> Result<()> {
        self.topics.replace(None);
        Ok(())
    }

    fn get_tokens(&self, topic: &str) -> Result<Option<HashSet<String>>> {
        Ok(self.tokens.borrow().get(topic).cloned())
    }

    fn save_tokens(&self, topic: &str, tokens: HashSet<String>) -> Result<()> {
        self.tokens.borrow_mut().insert(topic.to_string(), tokens);
        Ok(())
    }

    fn delete_tokens(&self, topic: &str) -> Result<()> {
        self.tokens.borrow_mut().remove(topic);
        Ok(())
    }
}
