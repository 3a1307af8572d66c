//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Page error: {0}")]
    Dom(#[from] tabpane_dom::DomError),

    #[error("Tab error: {0}")]
    Tab(#[from] tabpane_tabs::TabError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
