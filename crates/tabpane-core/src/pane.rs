//! Tabbed page container
//!
//! Owns the page and the controller wired against it. Constructing a
//! `TabPane` is the "document ready" point: buttons are wired exactly once.

use std::path::Path;

use tabpane_dom::Page;
use tabpane_tabs::{Activation, HandlerId, TabController};

use crate::config::Config;
use crate::Result;

pub struct TabPane {
    /// Configuration
    config: Config,
    /// Page markup
    page: Page,
    /// Controller wired at construction
    controller: TabController,
}

impl TabPane {
    /// Wire the tab buttons already present in `page`
    pub fn new(page: Page, config: Config) -> Result<Self> {
        config.validate()?;

        let controller = TabController::initialize(page.clone(), config.controller_options())?;

        if let Some(initial) = config.initial_tab.as_deref() {
            controller.click(initial)?;
        }

        tracing::info!(
            tabs = controller.len(),
            initial_tab = ?config.initial_tab,
            "Tab pane ready"
        );

        Ok(Self {
            config,
            page,
            controller,
        })
    }

    pub fn from_html(html: &str, config: Config) -> Result<Self> {
        Self::new(Page::parse(html), config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        let html = std::fs::read_to_string(path)?;
        Self::from_html(&html, config)
    }

    pub fn click(&self, target: &str) -> Result<Activation> {
        Ok(self.controller.click(target)?)
    }

    pub fn select_index(&self, index: usize) -> Result<Activation> {
        Ok(self.controller.select_index(index)?)
    }

    pub fn on_activate<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&Activation) + Send + Sync + 'static,
    {
        self.controller.on_activate(handler)
    }

    pub fn active_tab(&self) -> Option<String> {
        self.controller.active_button().map(|b| b.target)
    }

    /// `class` attribute of the element with `id`, as currently marked
    pub fn class_of(&self, id: &str) -> Result<Option<String>> {
        match self.page.get_by_id(id) {
            Some(node) => Ok(Some(self.page.class_attr(node)?)),
            None => Ok(None),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn controller(&self) -> &TabController {
        &self.controller
    }
}
