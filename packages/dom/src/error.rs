//! Error types for the document tree

use thiserror::Error;

pub type DomResult<T> = Result<T, DomError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    /// Insertion would make a node its own ancestor
    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("Node cannot have children: {0}")]
    NotAContainer(String),

    #[error("Node is not attached to a parent")]
    Detached,

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}
