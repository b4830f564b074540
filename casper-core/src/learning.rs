use crate::data::{MAX_MEMORY_CHARS, MemoryRecord, RecordKind};
use crate::error::{Result, StoreError};
use crate::store::MemoryStore;
use std::sync::Arc;
use tracing::{debug, error};

/// Somewhere to record a short text against an identifier.
pub trait LearningSink: Send + Sync {
    /// Returns whether the text was recorded.
    fn record(&self, identifier: &str, summary: &str) -> bool;
}

/// Validates and stores memories on top of a [`MemoryStore`].
#[derive(Clone)]
pub struct Learner {
    store: Arc<dyn MemoryStore>,
}

impl Learner {
    pub fn new(store: Arc<dyn MemoryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn MemoryStore> {
        &self.store
    }

    /// Stores what a user taught. Input must be non-blank and at most
    /// 500 characters; surrounding whitespace is trimmed.
    ///
    /// The limit counts Unicode scalar values, so a character outside the
    /// Basic Multilingual Plane (most emoji) counts once rather than as the
    /// two UTF-16 code units a JavaScript `length` would report.
    pub fn learn(&self, user_id: &str, info: &str) -> Result<MemoryRecord> {
        self.learn_as(user_id, info, RecordKind::Memory)
    }

    pub fn learn_as(&self, user_id: &str, info: &str, kind: RecordKind) -> Result<MemoryRecord> {
        if info.chars().count() > MAX_MEMORY_CHARS {
            return Err(StoreError::InvalidInput(format!(
                "text longer than {} characters",
                MAX_MEMORY_CHARS
            )));
        }
        let cleaned = info.trim();
        if cleaned.is_empty() {
            return Err(StoreError::InvalidInput("text is empty".to_string()));
        }

        let record = MemoryRecord::new(user_id, cleaned, kind);
        self.store.store(&record)?;
        debug!("Stored {} memory for {} ({})", kind.as_str(), user_id, record.category);
        Ok(record)
    }

    /// Recent memories for a user. Store failures are logged and read as empty.
    pub fn recall(&self, user_id: &str, limit: usize) -> Vec<MemoryRecord> {
        match self.store.retrieve(user_id, limit) {
            Ok(records) => records,
            Err(e) => {
                error!("Memory retrieval failed: {}", e);
                Vec::new()
            }
        }
    }
}

impl LearningSink for Learner {
    fn record(&self, identifier: &str, summary: &str) -> bool {
        match self.learn_as(identifier, summary, RecordKind::Web) {
            Ok(_) => true,
            Err(e) => {
                error!("Storage error for {}: {}", identifier, e);
                false
            }
        }
    }
}
