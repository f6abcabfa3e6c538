mod token;

pub mod config;
pub mod factory;

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use rusqlite::Connection as RawConnection;
use rusqlite::Transaction as RawTransaction;

use super::{Connection, Transaction};

/// SQLite-based token registry. Supports both file-based and in-memory
/// databases; the file form survives restarts.
pub struct Sqlite {
    conn: RawConnection,
}

/// SQLite transaction for executing database operations
pub struct SqliteTransaction<'a> {
    tx: RawTransaction<'a>,
}

impl Sqlite {
    /// Opens a SQLite database file. Creates one if it doesn't exist.
    /// Also initializes all required database tables.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = RawConnection::open(path)?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Creates a new in-memory database. Database content will be lost when the program exits.
    pub fn memory() -> Result<Self> {
        let conn = RawConnection::open_in_memory()?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    fn init_tables(db: &RawConnection) -> Result<()> {
        token::create_token_tables(db)?;
        Ok(())
    }
}

impl<'a> Connection<'a, SqliteTransaction<'a>> for Sqlite {
    fn transaction(&'a mut self) -> Result<SqliteTransaction<'a>> {
        let tx = self.conn.transaction()?;
        Ok(SqliteTransaction { tx })
    }
}

impl Transaction for SqliteTransaction<'_> {
    fn add_token(&self, topic: &str, token: &str) -> Result<()> {
        token::add_token(&self.tx, topic, token)
    }

    fn remove_token(&self, topic: &str, token: &str) -> Result<()> {
        token::remove_token(&self.tx, topic, token)
    }

    fn remove_topic(&self, topic: &str) -> Result<()> {
        token::remove_topic(&self.tx, topic)
    }

    fn get_tokens(&self, topic: &str) -> Result<HashSet<String>> {
        token::get_tokens(&self.tx, topic)
    }

    fn has_topic(&self, topic: &str) -> Result<bool> {
        token::has_topic(&self.tx, topic)
    }

    fn list_topics(&self) -> Result<Vec<String>> {
        token::list_topics(&self.tx)
    }

    fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;

    use crate::server::db::tests::run_all_db_tests;
    use crate::server::db::{Database, UnionConnection};

    use super::*;

    #[test]
    fn test_memory() {
        let sqlite = Sqlite::memory().unwrap();
        let conn = UnionConnection::Sqlite(sqlite);
        let db = Database::new(conn, None);

        run_all_db_tests(&db);
    }

    #[test]
    fn test_file() {
        let path = env::temp_dir().join("_topicgate_test_sqlite.db");
        let _ = fs::remove_file(&path);

        let sqlite = Sqlite::open(&path).unwrap();
        let conn = UnionConnection::Sqlite(sqlite);
        let db = Database::new(conn, None);

        run_all_db_tests(&db);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_file_persistence() {
        let path = env::temp_dir().join("_topicgate_test_sqlite_reopen.db");
        let _ = fs::remove_file(&path);

        let db = Database::new(UnionConnection::Sqlite(Sqlite::open(&path).unwrap()), None);
        assert!(db.create_token("admin", "k1").unwrap());
        assert!(db.create_token("oapi", "k2").unwrap());
        assert!(db.delete_token("oapi", None).unwrap());
        drop(db);

        let db = Database::new(UnionConnection::Sqlite(Sqlite::open(&path).unwrap()), None);
        assert!(db.is_token_authorized("admin", "k1").unwrap());
        assert!(db.is_resource_open("oapi").unwrap());
        assert_eq!(db.list_topics().unwrap(), vec!["admin"]);
        drop(db);

        fs::remove_file(&path).unwrap();
    }
}
