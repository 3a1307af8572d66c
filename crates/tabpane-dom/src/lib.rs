//! Tabpane Page Model
//!
//! Elements, ids and class lists read from page markup.
//! Every component holds a `Page` handle; the page is the only shared state.

mod element;
mod error;
mod page;

pub use element::{Element, NodeId};
pub use error::DomError;
pub use page::{Document, Page};

pub type Result<T> = std::result::Result<T, DomError>;
