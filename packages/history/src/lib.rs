//! # Livepage History
//!
//! Bounded, newest-first record of generated pages, persisted through a
//! pluggable [`Storage`] with quota-driven eviction.

pub mod error;
pub mod record;
pub mod storage;
pub mod store;

pub use error::{HistoryError, HistoryResult, StorageError};
pub use record::{HistoryRecord, StyleChoices};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{AppendOutcome, HistoryConfig, HistoryStore, DEFAULT_CAPACITY, DEFAULT_KEY};
