//! History bound, eviction and persistence

use livepage_history::{
    FileStorage, HistoryConfig, HistoryError, HistoryRecord, HistoryStore, MemoryStorage, Storage,
    StorageError, StyleChoices,
};

fn record(n: usize) -> HistoryRecord {
    HistoryRecord::new(format!("<p>page {}</p>", n), format!("prompt {}", n), None, StyleChoices::default())
}

/// Rejects any list holding more than `max` records
struct RecordLimit {
    inner: MemoryStorage,
    max: usize,
}

impl Storage for RecordLimit {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let count = serde_json::from_str::<Vec<serde_json::Value>>(value)
            .map(|v| v.len())
            .unwrap_or(0);
        if count > self.max {
            return Err(StorageError::QuotaExceeded { needed: count, quota: self.max });
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

#[test]
fn test_history_bound() {
    let mut store = HistoryStore::new(MemoryStorage::new(), HistoryConfig::default());
    for n in 0..20 {
        store.append(record(n)).unwrap();
    }
    assert_eq!(store.len(), 12);
    let prompts: Vec<_> = store.records().iter().map(|r| r.prompt.clone()).collect();
    let expected: Vec<_> = (8..20).rev().map(|n| format!("prompt {}", n)).collect();
    assert_eq!(prompts, expected);
}

#[test]
fn test_eviction_terminates_and_keeps_newest() {
    let config = HistoryConfig { capacity: 20, ..HistoryConfig::default() };
    let mut store = HistoryStore::new(MemoryStorage::new(), config.clone());
    for n in 0..8 {
        store.append(record(n)).unwrap();
    }

    // Re-open over a store that only fits three records
    let mut seeded = MemoryStorage::new();
    seeded
        .set(&config.key, &serde_json::to_string(store.records()).unwrap())
        .unwrap();
    let limited = RecordLimit { inner: seeded, max: 3 };
    let mut store = HistoryStore::open(limited, config).unwrap();
    assert_eq!(store.len(), 8);

    let outcome = store.append(record(99)).unwrap();
    assert!(outcome.durable);
    assert_eq!(outcome.evicted, 6);
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.records[0].prompt, "prompt 99");
    assert_eq!(outcome.records[1].prompt, "prompt 7");

    store.load().unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.latest().unwrap().prompt, "prompt 99");
}

#[test]
fn test_file_storage_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = HistoryStore::open(FileStorage::new(dir.path()), HistoryConfig::default()).unwrap();
    store.append(record(1)).unwrap();
    store.append(record(2)).unwrap();
    let first_id = store.records()[1].id.clone();
    store.remove(&first_id).unwrap();

    let reopened = HistoryStore::open(FileStorage::new(dir.path()), HistoryConfig::default()).unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.records()[0].prompt, "prompt 2");
    assert_eq!(reopened.records()[0], store.records()[0]);
}

#[test]
fn test_file_quota_evicts() {
    let dir = tempfile::tempdir().unwrap();
    let one = serde_json::to_string(&vec![record(0)]).unwrap().len();
    let storage = FileStorage::new(dir.path()).with_quota(Some(one * 2 + 16));
    let mut store = HistoryStore::new(storage, HistoryConfig::default());

    let mut last = None;
    for n in 0..5 {
        last = Some(store.append(record(n)).unwrap());
    }
    let outcome = last.unwrap();
    assert!(outcome.durable);
    assert!(outcome.records.len() <= 2);
    assert_eq!(outcome.records[0].prompt, "prompt 4");
}

#[test]
fn test_corrupt_storage_is_reported() {
    let mut storage = MemoryStorage::new();
    storage.set("livepage.history", "{not a list").unwrap();
    let result = HistoryStore::open(storage, HistoryConfig::default());
    assert!(matches!(result, Err(HistoryError::Corrupt(_))));
}
