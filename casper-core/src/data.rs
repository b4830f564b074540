use crate::error::{Result, StoreError};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// Longest text accepted as a single memory, in characters.
pub const MAX_MEMORY_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Something a user taught directly.
    Memory,
    /// A page summary recorded by the autonomous scanner.
    Web,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Memory => "memory",
            RecordKind::Web => "web",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "memory" => Some(RecordKind::Memory),
            "web" => Some(RecordKind::Web),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub category: String,
    pub timestamp: DateTime<Utc>,
    pub kind: RecordKind,
}

impl MemoryRecord {
    /// Builds a record from already-validated text. The category is the
    /// lowercased first word, or `misc` when there is none.
    pub fn new(user_id: &str, content: &str, kind: RecordKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            category: category_of(content),
            timestamp: Utc::now(),
            kind,
        }
    }
}

pub fn category_of(content: &str) -> String {
    content
        .split_whitespace()
        .next()
        .map(str::to_lowercase)
        .unwrap_or_else(|| "misc".to_string())
}

/// SQLite-backed memory storage.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        let db = Database {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS memories (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                content TEXT NOT NULL,
                category TEXT NOT NULL,
                kind TEXT NOT NULL CHECK(kind IN ('memory', 'web')),
                timestamp INTEGER NOT NULL  -- unix millis
            );

            CREATE INDEX IF NOT EXISTS idx_memories_user
                ON memories(user_id, timestamp DESC);
            ",
        )?;
        Ok(())
    }

    pub fn insert_memory(&self, record: &MemoryRecord) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO memories (id, user_id, content, category, kind, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                record.user_id,
                record.content,
                record.category,
                record.kind.as_str(),
                record.timestamp.timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    /// Newest first; ties fall back to insertion order, latest first.
    pub fn recent_memories(&self, user_id: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, content, category, kind, timestamp
             FROM memories
             WHERE user_id = ?1
             ORDER BY timestamp DESC, rowid DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![user_id, limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, user_id, content, category, kind, millis) = row?;
            let kind = RecordKind::parse(&kind)
                .ok_or_else(|| StoreError::Corrupt(format!("unknown kind '{}' on {}", kind, id)))?;
            let timestamp = DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| StoreError::Corrupt(format!("bad timestamp {} on {}", millis, id)))?;
            records.push(MemoryRecord {
                id,
                user_id,
                content,
                category,
                timestamp,
                kind,
            });
        }
        Ok(records)
    }

    pub fn count_memories(&self) -> Result<usize> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn count_users(&self) -> Result<usize> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT user_id) FROM memories",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
