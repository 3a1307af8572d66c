//! Tabpane Core
//!
//! Reads page markup, wires its tab buttons and exposes the controller.

mod config;
mod error;
mod pane;

pub use config::Config;
pub use error::CoreError;
pub use pane::TabPane;

// Re-export core components
pub use tabpane_dom::{DomError, Element, NodeId, Page};
pub use tabpane_tabs::{
    Activation, ContentSection, ControllerOptions, HandlerId, Marking, TabButton, TabController,
    TabError,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
