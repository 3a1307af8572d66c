//! Page handle and document operations

use parking_lot::RwLock;
use scraper::{ElementRef, Html};
use std::sync::Arc;

use crate::element::{Element, NodeId};
use crate::error::DomError;
use crate::Result;

/// Flat element list in document order.
///
/// Only reachable through [`Page::read`] and [`Page::transaction`], so every
/// multi-step mutation happens under a single lock.
#[derive(Debug, Default, Clone)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, node: NodeId) -> Result<&Element> {
        self.elements
            .get(node.index())
            .ok_or(DomError::NodeNotFound(node.index()))
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element> {
        self.elements
            .get_mut(node.index())
            .ok_or(DomError::NodeNotFound(node.index()))
    }

    /// All elements carrying `class`, in document order
    pub fn select_class(&self, class: &str) -> Vec<NodeId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.has_class(class))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// First element whose `id` equals `id`
    pub fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .position(|el| el.id.as_deref() == Some(id))
            .map(NodeId)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> Result<bool> {
        Ok(self.element(node)?.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        validate_class(class)?;
        if self.element_mut(node)?.insert_class(class) {
            tracing::trace!(node = %node, class, "Added class");
        }
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        validate_class(class)?;
        if self.element_mut(node)?.drop_class(class) {
            tracing::trace!(node = %node, class, "Removed class");
        }
        Ok(())
    }

    pub fn append(&mut self, element: Element) -> NodeId {
        self.elements.push(element);
        NodeId(self.elements.len() - 1)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

fn validate_class(class: &str) -> Result<()> {
    if class.is_empty() || class.chars().any(char::is_whitespace) {
        return Err(DomError::InvalidClass(class.to_string()));
    }
    Ok(())
}

/// Shared handle to a page.
///
/// Clones point at the same document.
pub struct Page {
    doc: Arc<RwLock<Document>>,
}

impl Page {
    pub fn new() -> Self {
        Self::from_elements(Vec::new())
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self {
            doc: Arc::new(RwLock::new(Document { elements })),
        }
    }

    /// Parse markup into a flat element list.
    ///
    /// Fragments are accepted; the parser supplies the `html`, `head` and
    /// `body` wrappers, which end up in the list like any other element.
    pub fn parse(html: &str) -> Self {
        let html = Html::parse_document(html);
        let elements: Vec<Element> = html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .map(convert_element)
            .collect();

        tracing::debug!(elements = elements.len(), "Parsed page markup");

        Self::from_elements(elements)
    }

    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Document) -> T,
    {
        let doc = self.doc.read();
        f(&doc)
    }

    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>,
    {
        let mut doc = self.doc.write();
        f(&mut doc)
    }

    pub fn len(&self) -> usize {
        self.read(Document::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(Document::is_empty)
    }

    pub fn element(&self, node: NodeId) -> Result<Element> {
        self.read(|doc| doc.element(node).cloned())
    }

    pub fn select_class(&self, class: &str) -> Vec<NodeId> {
        self.read(|doc| doc.select_class(class))
    }

    pub fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.read(|doc| doc.get_by_id(id))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> Result<bool> {
        self.read(|doc| doc.has_class(node, class))
    }

    pub fn class_attr(&self, node: NodeId) -> Result<String> {
        self.read(|doc| doc.element(node).map(Element::class_attr))
    }

    pub fn add_class(&self, node: NodeId, class: &str) -> Result<()> {
        self.transaction(|doc| doc.add_class(node, class))
    }

    pub fn remove_class(&self, node: NodeId, class: &str) -> Result<()> {
        self.transaction(|doc| doc.remove_class(node, class))
    }

    pub fn append(&self, element: Element) -> NodeId {
        self.doc.write().append(element)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Page {
    fn clone(&self) -> Self {
        Self {
            doc: Arc::clone(&self.doc),
        }
    }
}

fn convert_element(el: ElementRef<'_>) -> Element {
    let value = el.value();
    let mut element = Element::new(value.name());

    // Markup order, first occurrence wins
    if let Some(classes) = value.attr("class") {
        for class in classes.split_whitespace() {
            element = element.with_class(class);
        }
    }

    for (name, attr) in value.attrs() {
        match name {
            "id" => element.id = Some(attr.to_string()),
            "class" => {}
            _ => element = element.with_attribute(name, attr),
        }
    }

    let text: Vec<&str> = el.text().flat_map(str::split_whitespace).collect();
    element.with_text(text.join(" "))
}
