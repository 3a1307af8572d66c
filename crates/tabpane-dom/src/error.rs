//! Page error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Element not found: node {0}")]
    NodeNotFound(usize),

    #[error("Invalid class name: {0:?}")]
    InvalidClass(String),
}
