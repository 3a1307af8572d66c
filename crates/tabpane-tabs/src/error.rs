//! Tab error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TabError {
    #[error("Tab button {button:?} targets missing section {target:?}")]
    MissingTarget { button: String, target: String },

    #[error("Tab button {0:?} has no target attribute")]
    MissingTargetAttribute(String),

    #[error("Invalid controller options: {0}")]
    InvalidOptions(String),

    #[error("More than one content section has id {0:?}")]
    DuplicateSection(String),

    #[error("Tab button not wired: {0}")]
    NotWired(String),

    #[error("Tab index {index} out of range ({len} tabs)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Page error: {0}")]
    Dom(#[from] tabpane_dom::DomError),
}
