//! Tabpane Tab Activation
//!
//! Clicking a tab button marks it and its content section active and every
//! other button and section inactive. Buttons are wired once, at
//! initialization, against an explicit target-to-section mapping.

mod controller;
mod error;
mod marking;
mod tab;

pub use controller::{ControllerOptions, HandlerId, TabController};
pub use error::TabError;
pub use marking::Marking;
pub use tab::{Activation, ContentSection, TabButton};

pub type Result<T> = std::result::Result<T, TabError>;
