//! Primitive DOM helpers for component builders
//!
//! Thin best-effort wrappers over [`Document`]. Invalid input is reported as
//! a warning and the call degrades to a no-op instead of failing the builder.

use crate::document::{Document, ElementId};
use crate::error::DomError;

/// Child argument for [`insert_in`]: a tag name or an existing element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertTag<'a> {
    Tag(&'a str),
    Element(ElementId),
}

impl<'a> From<&'a str> for InsertTag<'a> {
    fn from(tag: &'a str) -> Self {
        InsertTag::Tag(tag)
    }
}

impl From<ElementId> for InsertTag<'_> {
    fn from(id: ElementId) -> Self {
        InsertTag::Element(id)
    }
}

fn warn(err: &DomError) {
    tracing::warn!("{}", err);
}

/// Create a detached element. Warns and returns `None` for an invalid tag.
pub fn make(doc: &mut Document, tag: &str) -> Option<ElementId> {
    doc.create_element(tag).inspect_err(warn).ok()
}

/// Set an inline style property on an element
pub fn style_set(doc: &mut Document, element: ElementId, property: &str, value: &str) {
    let _ = doc.set_style(element, property, value).inspect_err(warn);
}

/// Assign an id to an element
pub fn tag(doc: &mut Document, element: ElementId, id: &str) -> bool {
    doc.set_id(element, id).inspect_err(warn).is_ok()
}

/// Replace an element's classes with `class_name` (whitespace separated)
pub fn class_set(doc: &mut Document, element: ElementId, class_name: &str) -> bool {
    doc.set_class_name(element, class_name)
        .inspect_err(warn)
        .is_ok()
}

/// Append a child to `parent` and set its text content.
///
/// `child` is either a tag name, in which case a new element is created, or
/// an existing element. Returns the inserted element.
pub fn insert_in<'a>(
    doc: &mut Document,
    parent: ElementId,
    child: impl Into<InsertTag<'a>>,
    inner: Option<&str>,
) -> Option<ElementId> {
    let child = match child.into() {
        InsertTag::Element(id) if doc.contains(id) => id,
        InsertTag::Element(_) => {
            warn(&DomError::UnknownElement);
            return None;
        }
        InsertTag::Tag(tag) => make(doc, tag)?,
    };

    doc.set_text_content(child, inner)
        .and_then(|()| doc.append_child(parent, child))
        .inspect_err(warn)
        .ok()?;
    Some(child)
}
