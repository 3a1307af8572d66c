//! Active marking
//!
//! Every tab button and content section is in one of two states:
//! ```text
//! Inactive
//!   ↓ click on its button
//! Active
//!   ↓ click on any other button
//! Inactive
//! ```
//! Clicking an already active button leaves it active.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marking {
    /// Carries the active class
    Active,
    /// Does not carry the active class
    Inactive,
}

impl Marking {
    pub fn from_flag(active: bool) -> Self {
        if active {
            Marking::Active
        } else {
            Marking::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Marking::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Marking::Active => "active",
            Marking::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for Marking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Marking {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Marking::Active),
            "inactive" => Ok(Marking::Inactive),
            _ => Err(format!("Unknown marking: {}", s)),
        }
    }
}
