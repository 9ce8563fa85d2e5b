use livepage_history::HistoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("history error: {0}")]
    History(#[from] HistoryError),

    #[error("no history record with id {0}")]
    RecordNotFound(String),
}

/// Failure reported by a [`crate::Generator`]
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("generator failed: {0}")]
    Failed(String),

    #[error("generator returned no markup")]
    Empty,

    #[error("generator I/O error: {0}")]
    Io(#[from] std::io::Error),
}
