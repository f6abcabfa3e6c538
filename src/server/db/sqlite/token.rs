use std::collections::HashSet;

use anyhow::Result;
use chrono::Utc;
use log::debug;
use rusqlite::{params, Connection, Transaction};

// One row per (topic, token) pair. A topic without rows is open, so an
// "entry without tokens" cannot be stored at all.
const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS topic_token (
    topic TEXT NOT NULL,
    token TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    PRIMARY KEY (topic, token)
);
"#;

pub fn create_token_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

pub fn add_token(tx: &Transaction, topic: &str, token: &str) -> Result<()> {
    let sql = "INSERT OR IGNORE INTO topic_token (topic, token, create_time) VALUES (?, ?, ?)";
    debug!("Database add_token: {sql}, {topic}");
    tx.execute(sql, params![topic, token, Utc::now().timestamp()])?;
    Ok(())
}

pub fn remove_token(tx: &Transaction, topic: &str, token: &str) -> Result<()> {
    let sql = "DELETE FROM topic_token WHERE topic = ? AND token = ?";
    debug!("Database remove_token: {sql}, {topic}");
    tx.execute(sql, params![topic, token])?;
    Ok(())
}

pub fn remove_topic(tx: &Transaction, topic: &str) -> Result<()> {
    let sql = "DELETE FROM topic_token WHERE topic = ?";
    debug!("Database remove_topic: {sql}, {topic}");
    tx.execute(sql, params![topic])?;
    Ok(())
}

pub fn get_tokens(tx: &Transaction, topic: &str) -> Result<HashSet<String>> {
    let sql = "SELECT token FROM topic_token WHERE topic = ?";
    debug!("Database get_tokens: {sql}, {topic}");

    let mut stmt = tx.prepare(sql)?;
    let rows = stmt.query_map(params![topic], |row| row.get::<_, String>(0))?;

    let mut tokens = HashSet::new();
    for row in rows {
        tokens.insert(row?);
    }
    Ok(tokens)
}

pub fn has_topic(tx: &Transaction, topic: &str) -> Result<bool> {
    let sql = "SELECT EXISTS (SELECT 1 FROM topic_token WHERE topic = ?)";
    debug!("Database has_topic: {sql}, {topic}");

    let exists: bool = tx.query_row(sql, params![topic], |row| row.get(0))?;
    Ok(exists)
}

pub fn list_topics(tx: &Transaction) -> Result<Vec<String>> {
    let sql = "SELECT DISTINCT topic FROM topic_token ORDER BY topic";
    debug!("Database list_topics: {sql}");

    let mut stmt = tx.prepare(sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut topics = vec![];
    for row in rows {
        topics.push(row?);
    }
    Ok(topics)
}
