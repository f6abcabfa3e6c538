mod sqlite;
mod store;

#[cfg(test)]
mod tests;

pub mod cache;
pub mod config;
pub mod factory;

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{bail, Result};
use cache::{Cache, DisableCache, UnionCache};
use sqlite::{Sqlite, SqliteTransaction};

/// Database connection trait that can create transactions
pub trait Connection<'a, T>
where
    T: Transaction + 'a,
{
    /// Creates a new transaction from the connection
    fn transaction(&'a mut self) -> Result<T>;
}

/// The narrow key/set interface the token store is built on. A topic exists
/// exactly when at least one token is stored for it.
pub trait Transaction {
    /// Adds a token to the topic's set, creating the topic if needed. Adding
    /// an existing token is a no-op.
    fn add_token(&self, topic: &str, token: &str) -> Result<()>;
    /// Removes one token from the topic's set
    fn remove_token(&self, topic: &str, token: &str) -> Result<()>;
    /// Removes the topic together with all its tokens
    fn remove_topic(&self, topic: &str) -> Result<()>;
    /// Returns the token set of a topic, empty when the topic does not exist
    fn get_tokens(&self, topic: &str) -> Result<HashSet<String>>;
    /// Checks if a topic has at least one token
    fn has_topic(&self, topic: &str) -> Result<bool>;
    /// Lists all protected topics, sorted
    fn list_topics(&self) -> Result<Vec<String>>;

    /// Commits the transaction
    fn commit(self) -> Result<()>;
    /// Rolls back the transaction
    fn rollback(self) -> Result<()>;
}

/// Shared handle to the token registry. Every store operation runs inside a
/// single transaction guarded by the internal mutex.
pub struct Database {
    ctx: Mutex<DatabaseContext>,
}

/// Enum representing different supported database connections
pub enum UnionConnection {
    /// SQLite database connection
    Sqlite(Sqlite),
}

enum UnionTransaction<'a> {
    Sqlite(SqliteTransaction<'a>),
}

struct DatabaseContext {
    conn: RefCell<UnionConnection>,
    cache: Option<UnionCache>,
    no_cache: DisableCache,
}

impl Database {
    /// Creates a new database instance with optional caching
    pub fn new(conn: UnionConnection, cache: Option<UnionCache>) -> Self {
        Self {
            ctx: Mutex::new(DatabaseContext {
                conn: RefCell::new(conn),
                cache,
                no_cache: DisableCache,
            }),
        }
    }

    /// In-memory database with the memory cache enabled.
    #[cfg(test)]
    pub fn new_test() -> Self {
        let sqlite = Sqlite::memory().unwrap();
        let cache = UnionCache::Memory(cache::MemoryCache::new());
        Self::new(UnionConnection::Sqlite(sqlite), Some(cache))
    }

    /// Executes a function within a transaction context with optional caching support.
    ///
    /// - If the function `f` succeeds, the transaction will be committed
    /// - If the function `f` fails (returns an error), the transaction will be rolled back
    /// - If the transaction operations (commit/rollback) fail, the error will be returned
    ///
    /// The function `f` receives the transaction and a cache. When caching is
    /// disabled the cache is a no-op implementation, so callers never need to
    /// branch on it. Writers must invalidate what they touch through the same
    /// cache before returning; the mutex makes that invalidation atomic with
    /// the write.
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn Transaction, &dyn Cache) -> Result<T>,
    {
        let ctx = match self.ctx.lock() {
            Ok(ctx) => ctx,
            Err(e) => bail!("failed to lock database: {e:#}"),
        };
        let mut conn = ctx.conn.borrow_mut();
        let tx = conn.transaction()?;

        let result = if let Some(ref cache) = ctx.cache {
            f(&tx, cache)
        } else {
            f(&tx, &ctx.no_cache)
        };

        if result.is_ok() {
            tx.commit()
        } else {
            tx.rollback()
        }?;

        result
    }
}

impl<'a> Connection<'a, UnionTransaction<'a>> for UnionConnection {
    fn transaction(&'a mut self) -> Result<UnionTransaction<'a>> {
        match self {
            UnionConnection::Sqlite(sqlite) => sqlite.transaction().map(UnionTransaction::Sqlite),
        }
    }
}

impl Transaction for UnionTransaction<'_> {
    fn add_token(&self, topic: &str, token: &str) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.add_token(topic, token),
        }
    }

    fn remove_token(&self, topic: &str, token: &str) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.remove_token(topic, token),
        }
    }

    fn remove_topic(&self, topic: &str) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.remove_topic(topic),
        }
    }

    fn get_tokens(&self, topic: &str) -> Result<HashSet<String>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_tokens(topic),
        }
    }

    fn has_topic(&self, topic: &str) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.has_topic(topic),
        }
    }

    fn list_topics(&self) -> Result<Vec<String>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_topics(),
        }
    }

    fn commit(self) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.commit(),
        }
    }

    fn rollback(self) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.rollback(),
        }
    }
}

#[cfg(test)]
mod db_tests {
    use std::sync::Arc;
    use std::thread;

    use super::tests::run_all_db_tests;
    use super::*;

    #[test]
    fn test_memory_with_cache() {
        let db = Database::new_test();
        run_all_db_tests(&db);
    }

    #[test]
    fn test_concurrent_writes() {
        let db = Arc::new(Database::new_test());

        let mut handles = vec![];
        for i in 0..8 {
            let db = db.clone();
            handles.push(thread::spawn(move || {
                let token = format!("token-{i}");
                for _ in 0..50 {
                    assert!(db.create_token("shared", &token).unwrap());
                    assert!(db.is_token_authorized("shared", &token).unwrap());
                    assert!(db.delete_token("shared", Some(&token)).unwrap());
                }
                if i % 2 == 0 {
                    assert!(db.create_token("shared", &token).unwrap());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // Only the even writers left their token behind
        db.with_transaction(|tx, _cache| {
            let tokens = tx.get_tokens("shared")?;
            assert_eq!(tokens.len(), 4);
            for i in (0..8).step_by(2) {
                assert!(tokens.contains(&format!("token-{i}")));
            }
            Ok(())
        })
        .unwrap();
        assert!(!db.is_resource_open("shared").unwrap());

        for i in (0..8).step_by(2) {
            assert!(db.delete_token("shared", Some(&format!("token-{i}"))).unwrap());
        }
        assert!(db.is_resource_open("shared").unwrap());
        assert!(db.list_topics().unwrap().is_empty());
    }
}
