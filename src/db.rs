//! Database module for Hair Advisor Chat
//! Handles SQLite storage for durable client state (the conversation session slot)

use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::Path;
use tracing::debug;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        debug!(path = %path.display(), "Database opened");
        Ok(db)
    }

    /// Open a throwaway database that lives only as long as the handle
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a stored value
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
    }

    /// Set a stored value, replacing any previous one
    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_none() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_value("nope").unwrap(), None);
    }

    #[test]
    fn set_value_overwrites() {
        let db = Database::open_in_memory().unwrap();
        db.set_value("k", "one").unwrap();
        db.set_value("k", "two").unwrap();
        assert_eq!(db.get_value("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn values_survive_reopen() {
        let dir = std::env::temp_dir().join(format!("hair-advisor-db-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("client.db");
        {
            let db = Database::open(&path).unwrap();
            db.set_value("k", "kept").unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.get_value("k").unwrap().as_deref(), Some("kept"));
        drop(db);
        std::fs::remove_dir_all(&dir).ok();
    }
}
