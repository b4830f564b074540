//! Pluggable storage for learned memories.
//!
//! [`open_store`] picks a backend the way the server does at start-up: a
//! configured SQLite file when it opens, otherwise a process-local memory
//! store.

use crate::data::{Database, MemoryRecord};
use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub const DEFAULT_RETRIEVE_LIMIT: usize = 10;

pub trait MemoryStore: Send + Sync {
    fn store(&self, record: &MemoryRecord) -> Result<()>;

    /// Most recent records for a user, newest first.
    fn retrieve(&self, user_id: &str, limit: usize) -> Result<Vec<MemoryRecord>>;

    /// `(users, memories)` held by the store.
    fn counts(&self) -> Result<(usize, usize)>;

    fn backend(&self) -> &'static str;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub sqlite_path: Option<PathBuf>,
}

#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<MemoryRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryStore for InMemoryStore {
    fn store(&self, record: &MemoryRecord) -> Result<()> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records.push(record.clone());
        Ok(())
    }

    fn retrieve(&self, user_id: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        // Reverse first so the stable sort keeps later inserts ahead on ties.
        let mut matching: Vec<MemoryRecord> = records
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.truncate(limit);
        Ok(matching)
    }

    fn counts(&self) -> Result<(usize, usize)> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let mut users: Vec<&str> = records.iter().map(|r| r.user_id.as_str()).collect();
        users.sort_unstable();
        users.dedup();
        Ok((users.len(), records.len()))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

impl MemoryStore for Database {
    fn store(&self, record: &MemoryRecord) -> Result<()> {
        self.insert_memory(record)
    }

    fn retrieve(&self, user_id: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        self.recent_memories(user_id, limit)
    }

    fn counts(&self) -> Result<(usize, usize)> {
        Ok((self.count_users()?, self.count_memories()?))
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

/// Opens the configured backend, falling back to memory when none is
/// configured or the configured one fails to open.
pub fn open_store(config: &StoreConfig) -> Arc<dyn MemoryStore> {
    if let Some(ref path) = config.sqlite_path {
        match Database::new(path) {
            Ok(db) => {
                info!("Using SQLite at {} as primary store", path.display());
                return Arc::new(db);
            }
            Err(e) => {
                warn!("Failed to open SQLite store at {}: {}", path.display(), e);
            }
        }
    }

    warn!("No database configured - using memory only");
    Arc::new(InMemoryStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RecordKind;
    use chrono::{Duration, Utc};

    fn record_at(user: &str, content: &str, minutes_ago: i64) -> MemoryRecord {
        let mut record = MemoryRecord::new(user, content, RecordKind::Memory);
        record.timestamp = Utc::now() - Duration::minutes(minutes_ago);
        record
    }

    #[test]
    fn test_memory_store_filters_and_orders() {
        let store = InMemoryStore::new();
        store.store(&record_at("alice", "old", 10)).unwrap();
        store.store(&record_at("bob", "other user", 0)).unwrap();
        store.store(&record_at("alice", "new", 1)).unwrap();

        let records = store.retrieve("alice", DEFAULT_RETRIEVE_LIMIT).unwrap();
        let contents: Vec<&str> = records.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["new", "old"]);
    }

    #[test]
    fn test_memory_store_limit() {
        let store = InMemoryStore::new();
        for i in 0..15 {
            store.store(&record_at("alice", &format!("fact {}", i), i)).unwrap();
        }
        let records = store.retrieve("alice", DEFAULT_RETRIEVE_LIMIT).unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].content, "fact 0");
    }

    #[test]
    fn test_memory_store_ties_prefer_latest_insert() {
        let store = InMemoryStore::new();
        let first = record_at("alice", "first", 0);
        let mut second = record_at("alice", "second", 0);
        second.timestamp = first.timestamp;
        store.store(&first).unwrap();
        store.store(&second).unwrap();

        let records = store.retrieve("alice", 10).unwrap();
        assert_eq!(records[0].content, "second");
    }

    #[test]
    fn test_memory_store_counts() {
        let store = InMemoryStore::new();
        store.store(&record_at("alice", "a", 0)).unwrap();
        store.store(&record_at("alice", "b", 0)).unwrap();
        store.store(&record_at("bob", "c", 0)).unwrap();
        assert_eq!(store.counts().unwrap(), (2, 3));
    }

    #[test]
    fn test_open_store_without_path_uses_memory() {
        let store = open_store(&StoreConfig::default());
        assert_eq!(store.backend(), "memory");
    }
}
