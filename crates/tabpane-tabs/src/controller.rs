//! Tab Controller
//!
//! Wires the tab buttons of a page once and switches the active marking on
//! every click.

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use tabpane_dom::{Document, NodeId, Page};

use crate::error::TabError;
use crate::marking::Marking;
use crate::tab::{Activation, ContentSection, TabButton};
use crate::Result;

/// Class and attribute names the controller reads from the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerOptions {
    pub button_class: String,
    pub content_class: String,
    /// Attribute on a button naming its section's id
    pub target_attribute: String,
    pub active_class: String,
    /// Reject buttons whose target has no section at initialization
    pub strict_targets: bool,
}

impl ControllerOptions {
    /// Every name must be a single non-empty token, and buttons and sections
    /// must use different classes
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("button_class", &self.button_class),
            ("content_class", &self.content_class),
            ("target_attribute", &self.target_attribute),
            ("active_class", &self.active_class),
        ];

        for (field, value) in names {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(TabError::InvalidOptions(format!(
                    "{} must be a single non-empty name, got {:?}",
                    field, value
                )));
            }
        }

        if self.button_class == self.content_class {
            return Err(TabError::InvalidOptions(
                "button_class and content_class must differ".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            button_class: "tab-btn".to_string(),
            content_class: "tab-content".to_string(),
            target_attribute: "data-tab".to_string(),
            active_class: "active".to_string(),
            strict_targets: true,
        }
    }
}

/// Identifies a registered activation handler
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerId(String);

impl HandlerId {
    fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HandlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

type Handler = Arc<dyn Fn(&Activation) + Send + Sync>;

/// Buttons and sections found at initialization. Never changes afterwards.
struct Registry {
    buttons: Vec<TabButton>,
    sections: Vec<ContentSection>,
    /// Section node of each button, by button position; `None` when unresolved
    targets: Vec<Option<NodeId>>,
}

impl Registry {
    fn scan(doc: &Document, options: &ControllerOptions) -> Result<Self> {
        let mut sections = Vec::new();
        let mut section_ids: HashMap<String, NodeId> = HashMap::new();
        for node in doc.select_class(&options.content_class) {
            let section = ContentSection::from_element(node, doc.element(node)?);
            if let Some(id) = &section.id {
                if section_ids.insert(id.clone(), node).is_some() {
                    return Err(TabError::DuplicateSection(id.clone()));
                }
            }
            sections.push(section);
        }

        let mut buttons = Vec::new();
        let mut targets = Vec::new();
        for node in doc.select_class(&options.button_class) {
            let button =
                TabButton::from_element(node, doc.element(node)?, &options.target_attribute)?;
            let section = section_ids.get(&button.target).copied();

            if section.is_none() {
                if options.strict_targets {
                    return Err(TabError::MissingTarget {
                        button: button.display_label().to_string(),
                        target: button.target,
                    });
                }
                tracing::warn!(
                    button = %button.display_label(),
                    target = %button.target,
                    "Tab button targets a missing section"
                );
            }

            targets.push(section);
            buttons.push(button);
        }

        Ok(Self {
            buttons,
            sections,
            targets,
        })
    }

    /// First button in document order targeting `target`
    fn position_of_target(&self, target: &str) -> Option<usize> {
        self.buttons.iter().position(|b| b.target == target)
    }

    fn position_of_node(&self, node: NodeId) -> Option<usize> {
        self.buttons.iter().position(|b| b.node == node)
    }
}

pub struct TabController {
    registry: Arc<Registry>,
    /// Activation handlers in registration order
    handlers: Arc<RwLock<Vec<(HandlerId, Handler)>>>,
    options: Arc<ControllerOptions>,
    /// Page whose elements carry the marking
    page: Page,
}

impl TabController {
    /// Wire every tab button currently in the page.
    ///
    /// Buttons appended to the page afterwards are not wired.
    pub fn initialize(page: Page, options: ControllerOptions) -> Result<Self> {
        options.validate()?;
        let registry = page.read(|doc| Registry::scan(doc, &options))?;

        tracing::info!(
            buttons = registry.buttons.len(),
            sections = registry.sections.len(),
            strict = options.strict_targets,
            "Initialized tab controller"
        );

        Ok(Self {
            registry: Arc::new(registry),
            handlers: Arc::new(RwLock::new(Vec::new())),
            options: Arc::new(options),
            page,
        })
    }

    /// Click the wired button targeting `target`.
    ///
    /// When several buttons share a target, the first in document order is
    /// clicked; use [`TabController::click_node`] to pick another.
    pub fn click(&self, target: &str) -> Result<Activation> {
        let index = self
            .registry
            .position_of_target(target)
            .ok_or_else(|| TabError::NotWired(target.to_string()))?;
        self.activate(index)
    }

    /// Click the wired button at `node`
    pub fn click_node(&self, node: NodeId) -> Result<Activation> {
        let index = self
            .registry
            .position_of_node(node)
            .ok_or_else(|| TabError::NotWired(node.to_string()))?;
        self.activate(index)
    }

    /// Click the button at `index` in document order
    pub fn select_index(&self, index: usize) -> Result<Activation> {
        let len = self.registry.buttons.len();
        if index >= len {
            return Err(TabError::IndexOutOfRange { index, len });
        }
        self.activate(index)
    }

    fn activate(&self, index: usize) -> Result<Activation> {
        let button = &self.registry.buttons[index];
        let section = self.registry.targets[index];
        let options = &self.options;

        self.page.transaction(|doc| {
            // Re-query so elements added after initialization are cleared too
            for node in doc.select_class(&options.button_class) {
                doc.remove_class(node, &options.active_class)?;
            }
            for node in doc.select_class(&options.content_class) {
                doc.remove_class(node, &options.active_class)?;
            }

            doc.add_class(button.node, &options.active_class)?;
            if let Some(node) = section {
                doc.add_class(node, &options.active_class)?;
            }
            Ok(())
        })?;

        let activation = Activation {
            button: button.target.clone(),
            section: section.map(|_| button.target.clone()),
            index,
            activated_at: Utc::now(),
        };

        if activation.has_section() {
            tracing::debug!(
                button = %button.display_label(),
                section = %button.target,
                "Activated tab"
            );
        } else {
            tracing::warn!(
                button = %button.display_label(),
                target = %button.target,
                "Activated tab without a content section"
            );
        }

        self.notify(&activation);

        Ok(activation)
    }

    fn notify(&self, activation: &Activation) {
        // Handlers run unlocked and may register, remove or click
        let handlers: Vec<Handler> = self
            .handlers
            .read()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();

        for handler in handlers {
            handler(activation);
        }
    }

    /// Register a handler invoked after every successful click.
    ///
    /// A handler holding a clone of this controller keeps it alive for as long
    /// as it stays registered, and a handler that clicks re-enters itself with
    /// no depth limit.
    pub fn on_activate<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&Activation) + Send + Sync + 'static,
    {
        let id = HandlerId::new();
        self.handlers.write().push((id.clone(), Arc::new(handler)));
        tracing::debug!(handler_id = %id, "Registered activation handler");
        id
    }

    /// Returns false if the handler was not registered
    pub fn remove_handler(&self, id: &HandlerId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(h, _)| h != id);
        handlers.len() != before
    }

    /// First wired button carrying the active marking
    pub fn active_button(&self) -> Option<TabButton> {
        let class = &self.options.active_class;
        self.page.read(|doc| {
            self.registry
                .buttons
                .iter()
                .find(|b| doc.has_class(b.node, class).unwrap_or(false))
                .cloned()
        })
    }

    /// Id of the first content section carrying the active marking
    pub fn active_section(&self) -> Option<String> {
        let class = &self.options.active_class;
        self.page.read(|doc| {
            self.registry
                .sections
                .iter()
                .filter(|s| doc.has_class(s.node, class).unwrap_or(false))
                .find_map(|s| s.id.clone())
        })
    }

    /// Marking of the first button targeting `target`
    pub fn marking_of(&self, target: &str) -> Result<Marking> {
        let index = self
            .registry
            .position_of_target(target)
            .ok_or_else(|| TabError::NotWired(target.to_string()))?;
        let node = self.registry.buttons[index].node;
        let active = self.page.has_class(node, &self.options.active_class)?;
        Ok(Marking::from_flag(active))
    }

    pub fn buttons(&self) -> Vec<TabButton> {
        self.registry.buttons.clone()
    }

    pub fn sections(&self) -> Vec<ContentSection> {
        self.registry.sections.clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.registry
            .buttons
            .iter()
            .map(|b| b.display_label().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registry.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.buttons.is_empty()
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}

impl Clone for TabController {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            handlers: Arc::clone(&self.handlers),
            options: Arc::clone(&self.options),
            page: self.page.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tabpane_dom::Element;

    const TWO_TABS: &str = r#"
        <button class="tab-btn" data-tab="tab-a">A</button>
        <button class="tab-btn" data-tab="tab-b">B</button>
        <section id="tab-a" class="tab-content"></section>
        <section id="tab-b" class="tab-content"></section>
    "#;

    fn controller(markup: &str) -> TabController {
        TabController::initialize(Page::parse(markup), ControllerOptions::default()).unwrap()
    }

    fn lenient(markup: &str) -> TabController {
        let options = ControllerOptions {
            strict_targets: false,
            ..ControllerOptions::default()
        };
        TabController::initialize(Page::parse(markup), options).unwrap()
    }

    fn active_count(page: &Page, class: &str) -> usize {
        page.read(|doc| {
            doc.select_class(class)
                .into_iter()
                .filter(|n| doc.has_class(*n, "active").unwrap())
                .count()
        })
    }

    #[test]
    fn test_nothing_active_before_click() {
        let tabs = controller(TWO_TABS);
        assert_eq!(tabs.len(), 2);
        assert!(tabs.active_button().is_none());
        assert!(tabs.active_section().is_none());
        assert_eq!(tabs.marking_of("tab-a").unwrap(), Marking::Inactive);
    }

    #[test]
    fn test_click_switches_tabs() {
        let tabs = controller(TWO_TABS);

        let activation = tabs.click("tab-a").unwrap();
        assert_eq!(activation.button, "tab-a");
        assert_eq!(activation.section.as_deref(), Some("tab-a"));
        assert_eq!(activation.index, 0);
        assert_eq!(tabs.active_button().unwrap().target, "tab-a");
        assert_eq!(tabs.active_section().as_deref(), Some("tab-a"));

        tabs.click("tab-b").unwrap();
        assert_eq!(tabs.active_button().unwrap().target, "tab-b");
        assert_eq!(tabs.active_section().as_deref(), Some("tab-b"));
        assert_eq!(tabs.marking_of("tab-a").unwrap(), Marking::Inactive);
        assert_eq!(tabs.marking_of("tab-b").unwrap(), Marking::Active);

        let page = tabs.page();
        assert_eq!(active_count(page, "tab-btn"), 1);
        assert_eq!(active_count(page, "tab-content"), 1);
    }

    #[test]
    fn test_click_active_tab_again_is_stable() {
        let tabs = controller(TWO_TABS);
        tabs.click("tab-b").unwrap();
        let page = tabs.page();
        let snapshot: Vec<String> =
            page.read(|doc| doc.elements().iter().map(|e| e.class_attr()).collect());

        tabs.click("tab-b").unwrap();
        let after: Vec<String> =
            page.read(|doc| doc.elements().iter().map(|e| e.class_attr()).collect());

        assert_eq!(snapshot, after);
        assert_eq!(tabs.marking_of("tab-b").unwrap(), Marking::Active);
    }

    #[test]
    fn test_markup_active_marking_is_cleared() {
        let tabs = controller(
            r#"
            <button class="tab-btn active" data-tab="tab-a">A</button>
            <button class="tab-btn" data-tab="tab-b">B</button>
            <section id="tab-a" class="tab-content active"></section>
            <section id="tab-b" class="tab-content"></section>
        "#,
        );
        assert_eq!(tabs.active_section().as_deref(), Some("tab-a"));

        tabs.click("tab-b").unwrap();
        assert_eq!(active_count(tabs.page(), "tab-btn"), 1);
        assert_eq!(tabs.active_section().as_deref(), Some("tab-b"));
    }

    #[test]
    fn test_missing_target_rejected_when_strict() {
        let result = TabController::initialize(
            Page::parse(r#"<button class="tab-btn" data-tab="tab-c">C</button>"#),
            ControllerOptions::default(),
        );
        assert_eq!(
            result.err(),
            Some(TabError::MissingTarget {
                button: "C".to_string(),
                target: "tab-c".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_target_activates_no_section_when_lenient() {
        let tabs = lenient(
            r#"
            <button class="tab-btn" data-tab="tab-a">A</button>
            <button class="tab-btn" data-tab="tab-c">C</button>
            <section id="tab-a" class="tab-content"></section>
        "#,
        );

        tabs.click("tab-a").unwrap();
        for _ in 0..3 {
            let activation = tabs.click("tab-c").unwrap();
            assert!(!activation.has_section());
            assert_eq!(tabs.active_button().unwrap().target, "tab-c");
            assert!(tabs.active_section().is_none());
            assert_eq!(active_count(tabs.page(), "tab-content"), 0);
        }
    }

    #[test]
    fn test_buttons_sharing_a_target() {
        let tabs = controller(
            r#"
            <button class="tab-btn" data-tab="tab-a">A</button>
            <button class="tab-btn" data-tab="tab-b">B</button>
            <button class="tab-btn" data-tab="tab-a">A again</button>
            <section id="tab-a" class="tab-content"></section>
            <section id="tab-b" class="tab-content"></section>
        "#,
        );
        assert_eq!(tabs.len(), 3);
        let first = tabs.buttons()[0].node;
        let second = tabs.buttons()[2].node;

        let activation = tabs.click_node(second).unwrap();
        assert_eq!(activation.index, 2);
        assert_eq!(activation.section.as_deref(), Some("tab-a"));
        assert_eq!(tabs.active_button().unwrap().node, second);
        assert_eq!(tabs.active_section().as_deref(), Some("tab-a"));
        assert_eq!(active_count(tabs.page(), "tab-btn"), 1);

        tabs.click_node(first).unwrap();
        assert_eq!(tabs.active_button().unwrap().node, first);
        assert!(!tabs.page().has_class(second, "active").unwrap());
        assert_eq!(tabs.active_section().as_deref(), Some("tab-a"));

        tabs.click("tab-b").unwrap();
        let activation = tabs.click("tab-a").unwrap();
        assert_eq!(activation.index, 0);
        assert_eq!(tabs.marking_of("tab-a").unwrap(), Marking::Active);
    }

    #[test]
    fn test_duplicate_sections_rejected() {
        let dup_section = r#"
            <section id="tab-a" class="tab-content"></section>
            <section id="tab-a" class="tab-content"></section>
        "#;
        assert_eq!(
            TabController::initialize(Page::parse(dup_section), ControllerOptions::default())
                .err(),
            Some(TabError::DuplicateSection("tab-a".to_string()))
        );
    }

    #[test]
    fn test_button_without_target_rejected() {
        let result = TabController::initialize(
            Page::parse(r#"<button class="tab-btn">Orphan</button>"#),
            ControllerOptions::default(),
        );
        assert_eq!(
            result.err(),
            Some(TabError::MissingTargetAttribute("Orphan".to_string()))
        );
    }

    #[test]
    fn test_empty_page() {
        let tabs = controller("<p>no tabs here</p>");
        assert!(tabs.is_empty());
        assert_eq!(
            tabs.select_index(0).err(),
            Some(TabError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_buttons_added_later_are_not_wired() {
        let tabs = controller(TWO_TABS);
        let page = tabs.page().clone();
        tabs.click("tab-a").unwrap();

        let late = page.append(
            Element::new("button")
                .with_class("tab-btn")
                .with_attribute("data-tab", "tab-b"),
        );

        assert_eq!(
            tabs.click_node(late).err(),
            Some(TabError::NotWired(late.to_string()))
        );
        assert!(!page.has_class(late, "active").unwrap());
        assert_eq!(tabs.active_button().unwrap().target, "tab-a");
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs.click("tab-z").err(), Some(TabError::NotWired("tab-z".to_string())));
    }

    #[test]
    fn test_click_clears_elements_added_after_initialize() {
        let tabs = controller(TWO_TABS);
        let page = tabs.page().clone();

        let late_button = page.append(
            Element::new("button")
                .with_class("tab-btn")
                .with_class("active")
                .with_attribute("data-tab", "tab-a"),
        );
        let late_section = page.append(
            Element::new("section")
                .with_id("late")
                .with_class("tab-content")
                .with_class("active"),
        );

        tabs.click("tab-b").unwrap();

        assert!(!page.has_class(late_button, "active").unwrap());
        assert!(!page.has_class(late_section, "active").unwrap());
        assert_eq!(active_count(&page, "tab-btn"), 1);
        assert_eq!(active_count(&page, "tab-content"), 1);
        assert_eq!(tabs.active_section().as_deref(), Some("tab-b"));
    }

    #[test]
    fn test_invalid_options_rejected_at_initialize() {
        let bad_active = ControllerOptions {
            active_class: "is active".to_string(),
            ..ControllerOptions::default()
        };
        assert!(matches!(
            TabController::initialize(Page::parse(TWO_TABS), bad_active),
            Err(TabError::InvalidOptions(_))
        ));

        let empty_attribute = ControllerOptions {
            target_attribute: String::new(),
            ..ControllerOptions::default()
        };
        assert!(matches!(
            TabController::initialize(Page::parse(TWO_TABS), empty_attribute),
            Err(TabError::InvalidOptions(_))
        ));

        let same_classes = ControllerOptions {
            content_class: "tab-btn".to_string(),
            ..ControllerOptions::default()
        };
        assert!(matches!(
            same_classes.validate(),
            Err(TabError::InvalidOptions(_))
        ));
        assert!(ControllerOptions::default().validate().is_ok());
    }

    #[test]
    fn test_select_index_and_click_node() {
        let tabs = controller(TWO_TABS);
        let activation = tabs.select_index(1).unwrap();
        assert_eq!(activation.button, "tab-b");

        let first = tabs.buttons()[0].node;
        tabs.click_node(first).unwrap();
        assert_eq!(tabs.active_section().as_deref(), Some("tab-a"));
        assert_eq!(tabs.labels(), vec!["A".to_string(), "B".to_string()]);
        assert_eq!(tabs.sections().len(), 2);
    }

    #[test]
    fn test_handlers() {
        let tabs = controller(TWO_TABS);
        let seen = Arc::new(RwLock::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = tabs.on_activate(move |a| sink.write().push(a.button.clone()));

        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        tabs.on_activate(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tabs.click("tab-a").unwrap();
        tabs.select_index(1).unwrap();
        assert_eq!(*seen.read(), vec!["tab-a".to_string(), "tab-b".to_string()]);

        assert!(tabs.remove_handler(&id));
        assert!(!tabs.remove_handler(&id));

        tabs.click("tab-a").unwrap();
        assert_eq!(seen.read().len(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_handler_can_read_page() {
        let tabs = controller(TWO_TABS);
        let reader = tabs.clone();
        let observed = Arc::new(RwLock::new(None));

        let sink = Arc::clone(&observed);
        tabs.on_activate(move |_| *sink.write() = reader.active_section());

        tabs.click("tab-b").unwrap();
        assert_eq!(observed.read().as_deref(), Some("tab-b"));
    }

    #[test]
    fn test_custom_classes() {
        let options = ControllerOptions {
            button_class: "nav-tab".to_string(),
            content_class: "pane".to_string(),
            target_attribute: "data-target".to_string(),
            active_class: "is-selected".to_string(),
            strict_targets: true,
        };
        let page = Page::parse(
            r#"
            <a class="nav-tab" data-target="one">One</a>
            <div class="pane" id="one"></div>
        "#,
        );
        let tabs = TabController::initialize(page.clone(), options).unwrap();

        tabs.click("one").unwrap();
        let section = page.get_by_id("one").unwrap();
        assert_eq!(page.class_attr(section).unwrap(), "pane is-selected");
    }
}
