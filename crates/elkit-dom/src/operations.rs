//! DOM operation errors

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors, named after the DOMException they stand for
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found")]
    NotFound,

    #[error("Hierarchy request error")]
    HierarchyRequest,

    #[error("Invalid character in name: {0:?}")]
    InvalidCharacter(String),

    #[error("Operation is not supported")]
    NotSupported,

    #[error("Invalid node type")]
    InvalidNodeType,

    #[error("Node is not a child")]
    NotAChild,
}
