//! Tab button, content section and activation records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tabpane_dom::{Element, NodeId};

use crate::error::TabError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabButton {
    /// Element carrying the button class
    pub node: NodeId,
    /// Identifier of the content section this button selects
    pub target: String,
    /// Button text, used for display and logging
    pub label: String,
}

impl TabButton {
    /// Read a button from its element.
    ///
    /// The target comes from `target_attribute`; an empty value counts as
    /// missing.
    pub fn from_element(node: NodeId, element: &Element, target_attribute: &str) -> Result<Self> {
        let label = element.text.clone();
        let target = element
            .attribute(target_attribute)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TabError::MissingTargetAttribute(display_name(node, &label)))?;

        Ok(Self {
            node,
            target: target.to_string(),
            label,
        })
    }

    /// Label with fallback to the target
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.target
        } else {
            &self.label
        }
    }
}

fn display_name(node: NodeId, label: &str) -> String {
    if label.is_empty() {
        node.to_string()
    } else {
        label.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    pub node: NodeId,
    /// Sections without an id cannot be targeted
    pub id: Option<String>,
}

impl ContentSection {
    pub fn from_element(node: NodeId, element: &Element) -> Self {
        Self {
            node,
            id: element.id.clone(),
        }
    }
}

/// Outcome of a click, passed to every activation handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    /// Target identifier of the clicked button
    pub button: String,
    /// Id of the section that became active, if any
    pub section: Option<String>,
    /// Position of the button in document order
    pub index: usize,
    pub activated_at: DateTime<Utc>,
}

impl Activation {
    pub fn has_section(&self) -> bool {
        self.section.is_some()
    }
}
