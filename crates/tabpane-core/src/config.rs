//! Tab configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use tabpane_tabs::ControllerOptions;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Class marking tab buttons
    pub button_class: String,
    /// Class marking content sections
    pub content_class: String,
    /// Button attribute holding the target section id
    pub target_attribute: String,
    /// Class applied to the selected button and section
    pub active_class: String,
    /// Fail initialization when a button targets a missing section
    pub strict_targets: bool,
    /// Tab to select right after initialization
    pub initial_tab: Option<String>,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.controller_options()
            .validate()
            .map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            button_class: self.button_class.clone(),
            content_class: self.content_class.clone(),
            target_attribute: self.target_attribute.clone(),
            active_class: self.active_class.clone(),
            strict_targets: self.strict_targets,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let options = ControllerOptions::default();

        Self {
            button_class: options.button_class,
            content_class: options.content_class,
            target_attribute: options.target_attribute,
            active_class: options.active_class,
            strict_targets: options.strict_targets,
            initial_tab: None,
        }
    }
}
