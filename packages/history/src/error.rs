use thiserror::Error;

/// Failures of the persistent layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// The write would exceed the store's capacity
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn is_quota(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("history data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("no history record with id {0}")]
    NotFound(String),
}

pub type HistoryResult<T> = Result<T, HistoryError>;
