//! # History Store
//!
//! Newest-first list of [`HistoryRecord`]s persisted as one JSON array under
//! a single storage key. When the storage rejects a write for capacity, the
//! oldest record is dropped and the write retried, down to the empty list.
//! That is at most `len + 1` attempts.

use crate::error::{HistoryError, HistoryResult, StorageError};
use crate::record::HistoryRecord;
use crate::storage::Storage;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPACITY: usize = 12;
pub const DEFAULT_KEY: &str = "livepage.history";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryConfig {
    pub capacity: usize,
    pub key: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            key: DEFAULT_KEY.to_string(),
        }
    }
}

/// Result of [`HistoryStore::append`]
#[derive(Debug, Clone, PartialEq)]
pub struct AppendOutcome {
    /// In-memory list after the append, newest first
    pub records: Vec<HistoryRecord>,
    /// Records dropped to make the write fit
    pub evicted: usize,
    /// False when the list held in memory is not what storage holds
    pub durable: bool,
}

struct Persisted {
    kept: Vec<HistoryRecord>,
    evicted: usize,
}

pub struct HistoryStore {
    storage: Box<dyn Storage>,
    config: HistoryConfig,
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    /// Empty store; call [`HistoryStore::load`] to read persisted records
    pub fn new(storage: impl Storage + 'static, config: HistoryConfig) -> Self {
        Self {
            storage: Box::new(storage),
            config,
            records: Vec::new(),
        }
    }

    /// Create and load in one step
    pub fn open(storage: impl Storage + 'static, config: HistoryConfig) -> HistoryResult<Self> {
        let mut store = Self::new(storage, config);
        store.load()?;
        Ok(store)
    }

    /// Replace the in-memory list with what storage holds
    pub fn load(&mut self) -> HistoryResult<&[HistoryRecord]> {
        self.records = match self.storage.get(&self.config.key)? {
            Some(text) if !text.trim().is_empty() => serde_json::from_str(&text)?,
            _ => Vec::new(),
        };
        self.records.truncate(self.capacity());
        tracing::debug!(records = self.records.len(), "history loaded");
        Ok(&self.records)
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity.max(1)
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.first()
    }

    /// Prepend `record`, truncate to capacity, and persist with eviction
    pub fn append(&mut self, record: HistoryRecord) -> HistoryResult<AppendOutcome> {
        let mut list = Vec::with_capacity(self.records.len() + 1);
        list.push(record);
        list.extend(self.records.iter().cloned());
        list.truncate(self.capacity());

        let outcome = match self.persist(list.clone())? {
            Some(persisted) if !persisted.kept.is_empty() => {
                self.records = persisted.kept;
                AppendOutcome {
                    records: self.records.clone(),
                    evicted: persisted.evicted,
                    durable: true,
                }
            }
            // The newest record does not fit on its own, or nothing fits
            other => {
                tracing::warn!(
                    wrote_empty = other.is_some(),
                    "history storage cannot hold the newest record, keeping it in memory only"
                );
                self.records = list;
                AppendOutcome {
                    records: self.records.clone(),
                    evicted: 0,
                    durable: false,
                }
            }
        };

        tracing::info!(
            records = outcome.records.len(),
            evicted = outcome.evicted,
            durable = outcome.durable,
            "history record appended"
        );
        Ok(outcome)
    }

    /// Remove one record and re-persist. Returns the removed record.
    pub fn remove(&mut self, id: &str) -> HistoryResult<HistoryRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| HistoryError::NotFound(id.to_string()))?;

        let mut list = self.records.clone();
        let removed = list.remove(index);
        match self.persist(list.clone())? {
            Some(persisted) => self.records = persisted.kept,
            None => self.records = list,
        }
        tracing::info!(id, "history record removed");
        Ok(removed)
    }

    /// Drop every record, in memory and in storage. Confirmation is the
    /// caller's job.
    pub fn clear(&mut self) -> HistoryResult<()> {
        self.records.clear();
        self.storage.remove(&self.config.key)?;
        tracing::info!("history cleared");
        Ok(())
    }

    /// Write `list`, dropping the oldest record after each capacity
    /// rejection. `None` when even the empty list was rejected.
    fn persist(&mut self, mut list: Vec<HistoryRecord>) -> HistoryResult<Option<Persisted>> {
        let mut evicted = 0;
        loop {
            let text = serde_json::to_string(&list)?;
            match self.storage.set(&self.config.key, &text) {
                Ok(()) => {
                    return Ok(Some(Persisted {
                        kept: list,
                        evicted,
                    }))
                }
                Err(StorageError::QuotaExceeded { needed, quota }) => {
                    if list.pop().is_none() {
                        tracing::warn!(needed, quota, "history storage rejects even an empty list");
                        return Ok(None);
                    }
                    evicted += 1;
                    tracing::warn!(needed, quota, remaining = list.len(), "history quota exceeded, evicting oldest record");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
