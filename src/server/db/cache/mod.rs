mod memory;


pub mod config;
pub mod factory;

use std::collections::HashSet;

use anyhow::Result;

pub use memory::MemoryCache;

/// Cache in front of the token store. Implementations are only ever used while
/// the database lock is held, so they need no synchronization of their own.
pub trait Cache {
    fn list_topics(&self) -> Result<Option<Vec<String>>>;
    fn save_topics(&self, topics: Vec<String>) -> Result<()>;
    fn clear_topics(&self) -> Result<()>;

    fn get_tokens(&self, topic: &str) -> Result<Option<HashSet<String>>>;
    fn save_tokens(&self, topic: &str, tokens: HashSet<String>) -> Result<()>;
    fn delete_tokens(&self, topic: &str) -> Result<()>;
}

pub enum UnionCache {
    Memory(MemoryCache),
}

impl Cache for UnionCache {
    fn list_topics(&self) -> Result<Option<Vec<String>>> {
        match self {
            Self::Memory(cache) => cache.list_topics(),
        }
    }

    fn save_topics(&self, topics: Vec<String>) -> Result<()> {
        match self {
            Self::Memory(cache) => cache.save_topics(topics),
        }
    }

    fn clear_topics(&self) -> Result<()> {
        match self {
            Self::Memory(cache) => cache.clear_topics(),
        }
    }

    fn get_tokens(&self, topic: &str) -> Result<Option<HashSet<String>>> {
        match self {
            Self::Memory(cache) => cache.get_tokens(topic),
        }
    }

    fn save_tokens(&self, topic: &str, tokens: HashSet<String>) -> Result<()> {
        match self {
            Self::Memory(cache) => cache.save_tokens(topic, tokens),
        }
    }

    fn delete_tokens(&self, topic: &str) -> Result<()> {
        match self {
            Self::Memory(cache) => cache.delete_tokens(topic),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DisableCache;

impl Cache for DisableCache {
    fn list_topics(&self) -> Result<Option<Vec<String>>> {
        Ok(None)
    }

    fn save_topics(&self, _topics: Vec<String>) -> Result<()> {
        Ok(())
    }

    fn clear_topics(&self) -> Result<()> {
        Ok(())
    }

    fn get_tokens(&self, _topic: &str) -> Result<Option<HashSet<String>>> {
        Ok(None)
    }

    fn save_tokens(&self, _topic: &str, _tokens: HashSet<String>) -> Result<()> {
        Ok(())
    }

    fn delete_tokens(&self, _topic: &str) -> Result<()> {
        Ok(())
    }
}
