//! In-memory document tree
//!
//! The document owns every element in a slotmap arena. Elements are created
//! detached and become part of the live tree once appended under `html`.
//! The `body` element is the mount root; a document created with
//! [`Document::loading`] has no body until [`Document::attach_body`] runs.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{DomError, Result};
use crate::signal::{MountSignal, SharedMountSignal};

new_key_type! {
    pub struct ElementId;
}

/// Shared document for access from async tasks
pub type SharedDocument = Arc<Mutex<Document>>;

/// A single element node
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    style: IndexMap<String, String>,
    text: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    fn new(tag: String) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    /// Lowercase tag name
    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Class list in insertion order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Inline style properties in assignment order
    pub fn style(&self) -> &IndexMap<String, String> {
        &self.style
    }

    pub fn style_property(&self, property: &str) -> Option<&str> {
        self.style.get(&normalize_property(property)).map(String::as_str)
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// Element tree with `html`, `head` and an optional `body`
#[derive(Debug)]
pub struct Document {
    nodes: SlotMap<ElementId, Element>,
    html: ElementId,
    head: ElementId,
    body: Option<ElementId>,
    mount_signal: SharedMountSignal,
}

impl Document {
    /// Create a fully parsed document with an empty body
    pub fn new() -> Self {
        let mut doc = Self::loading();
        doc.attach_body();
        doc
    }

    /// Create a document whose body has not been parsed yet
    pub fn loading() -> Self {
        let mut nodes = SlotMap::with_key();
        let html = nodes.insert(Element::new("html".to_string()));
        let head = nodes.insert(Element::new("head".to_string()));
        nodes[head].parent = Some(html);
        nodes[html].children.push(head);

        Self {
            nodes,
            html,
            head,
            body: None,
            mount_signal: Arc::new(MountSignal::new()),
        }
    }

    /// Wrap the document for shared access
    pub fn into_shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    pub fn html(&self) -> ElementId {
        self.html
    }

    pub fn head(&self) -> ElementId {
        self.head
    }

    /// The mount root, if it exists yet
    pub fn body(&self) -> Option<ElementId> {
        self.body
    }

    /// Signal fired once the body exists
    pub fn mount_signal(&self) -> SharedMountSignal {
        Arc::clone(&self.mount_signal)
    }

    /// Create the body element and wake everything waiting on the mount root.
    ///
    /// Returns the existing body when called again.
    pub fn attach_body(&mut self) -> ElementId {
        if let Some(body) = self.body {
            return body;
        }

        let body = self.nodes.insert(Element::new("body".to_string()));
        self.nodes[body].parent = Some(self.html);
        self.nodes[self.html].children.push(body);
        self.body = Some(body);

        tracing::debug!("document body attached");
        self.mount_signal.fire();
        body
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> Result<ElementId> {
        let tag = validate_tag_name(tag)?;
        Ok(self.nodes.insert(Element::new(tag)))
    }

    /// Whether the id refers to a live (not removed) element
    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether the element is attached to the document tree
    pub fn is_connected(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.html {
                return true;
            }
            current = self.nodes.get(node).and_then(|el| el.parent);
        }
        false
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id)
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.nodes.get_mut(id).ok_or(DomError::UnknownElement)
    }

    /// Set the element's id attribute
    pub fn set_id(&mut self, id: ElementId, value: &str) -> Result<()> {
        let value = validate_token("TagName", value)?;
        self.get_mut(id)?.id = Some(value.to_string());
        Ok(())
    }

    /// Replace the class list with the whitespace-separated classes
    pub fn set_class_name(&mut self, id: ElementId, class_name: &str) -> Result<()> {
        if class_name.trim().is_empty() {
            return Err(DomError::InvalidArgumentType {
                what: "ClassName",
                expected: "\"string\"",
                found: format!("{class_name:?}"),
            });
        }

        let el = self.get_mut(id)?;
        el.classes.clear();
        for class in class_name.split_whitespace() {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
        Ok(())
    }

    /// Add a single class. Returns `false` if it was already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) -> Result<bool> {
        let class = validate_token("ClassName", class)?;
        let el = self.get_mut(id)?;
        if el.has_class(class) {
            return Ok(false);
        }
        el.classes.push(class.to_string());
        Ok(true)
    }

    /// Set an inline style property. `camelCase` names are stored as `kebab-case`.
    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) -> Result<()> {
        if property.trim().is_empty() {
            return Err(DomError::InvalidArgumentType {
                what: "style property",
                expected: "non-empty \"string\"",
                found: format!("{property:?}"),
            });
        }

        let property = normalize_property(property);
        let el = self.get_mut(id)?;
        if value.is_empty() {
            el.style.shift_remove(&property);
        } else {
            el.style.insert(property, value.to_string());
        }
        Ok(())
    }

    /// Replace the element's content with text. Existing children are removed.
    pub fn set_text_content(&mut self, id: ElementId, text: Option<&str>) -> Result<()> {
        let children = std::mem::take(&mut self.get_mut(id)?.children);
        for child in children {
            self.free_subtree(child);
        }
        self.get_mut(id)?.text = text.filter(|t| !t.is_empty()).map(str::to_string);
        Ok(())
    }

    /// Append `child` as the last child of `parent`, moving it if already attached
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(DomError::UnknownElement);
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }

        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Insert `child` as the first child of `parent`
    pub fn prepend_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(DomError::UnknownElement);
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }

        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.insert(0, child);
        Ok(())
    }

    /// Detach the element and drop it together with its subtree.
    ///
    /// The `html` and `head` elements cannot be removed. Removing the body
    /// leaves the document without a mount root.
    pub fn remove(&mut self, id: ElementId) -> Result<()> {
        if !self.contains(id) {
            return Err(DomError::UnknownElement);
        }
        if id == self.html || id == self.head {
            return Err(DomError::HierarchyRequest);
        }

        self.detach(id);
        self.free_subtree(id);
        if self.body == Some(id) {
            self.body = None;
        }
        Ok(())
    }

    /// All connected elements in document order, starting at `html`
    pub fn walk(&self) -> Vec<ElementId> {
        self.descendants_inclusive(self.html)
    }

    /// `root` and all of its descendants in pre-order
    pub fn descendants_inclusive(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let Some(el) = self.nodes.get(node) else {
                continue;
            };
            out.push(node);
            stack.extend(el.children.iter().rev().copied());
        }
        out
    }

    /// Connected elements carrying `class`, in document order
    pub fn get_elements_by_class_name(&self, class: &str) -> Vec<ElementId> {
        self.walk()
            .into_iter()
            .filter(|&id| self.nodes[id].has_class(class))
            .collect()
    }

    /// First connected element with the given id attribute
    pub fn get_element_by_id(&self, value: &str) -> Option<ElementId> {
        self.walk()
            .into_iter()
            .find(|&id| self.nodes[id].id() == Some(value))
    }

    /// Text of every `<style>` element under the head
    pub fn style_sheets(&self) -> Vec<&str> {
        self.nodes[self.head]
            .children
            .iter()
            .filter_map(|&id| self.nodes.get(id))
            .filter(|el| el.tag == "style")
            .map(|el| el.text.as_deref().unwrap_or_default())
            .collect()
    }

    /// Number of live elements in the arena, connected or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serialize the connected tree as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.html, &mut out);
        out
    }

    /// Serialize a single element and its subtree as HTML
    pub fn outer_html(&self, id: ElementId) -> Option<String> {
        self.contains(id).then(|| {
            let mut out = String::new();
            self.write_html(id, &mut out);
            out
        })
    }

    fn write_html(&self, id: ElementId, out: &mut String) {
        let el = &self.nodes[id];
        let _ = write!(out, "<{}", el.tag);
        if let Some(value) = &el.id {
            let _ = write!(out, " id=\"{}\"", escape_attr(value));
        }
        if !el.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_attr(&el.classes.join(" ")));
        }
        if !el.style.is_empty() {
            let style: Vec<String> = el
                .style
                .iter()
                .map(|(k, v)| format!("{k}: {v};"))
                .collect();
            let _ = write!(out, " style=\"{}\"", escape_attr(&style.join(" ")));
        }
        out.push('>');
        if let Some(text) = &el.text {
            out.push_str(&escape_text(text));
        }
        for &child in &el.children {
            self.write_html(child, out);
        }
        let _ = write!(out, "</{}>", el.tag);
    }

    fn is_inclusive_ancestor(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.nodes.get(n).and_then(|el| el.parent);
        }
        false
    }

    fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.nodes.get_mut(id).and_then(|el| el.parent.take()) {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|&c| c != id);
            }
        }
    }

    fn free_subtree(&mut self, root: ElementId) {
        for id in self.descendants_inclusive(root) {
            self.nodes.remove(id);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_tag_name(tag: &str) -> Result<String> {
    let mut chars = tag.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(tag.to_ascii_lowercase())
    } else {
        Err(DomError::InvalidTagName(tag.to_string()))
    }
}

/// Ids and single classes must be non-empty and contain no whitespace
fn validate_token<'a>(what: &'static str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(DomError::InvalidArgumentType {
            what,
            expected: "\"string\"",
            found: format!("{value:?}"),
        });
    }
    Ok(value)
}

/// `backgroundColor` -> `background-color`; kebab-case passes through
fn normalize_property(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.trim().chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
