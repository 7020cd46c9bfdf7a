//! Style injection
//!
//! Component styles are global: each registration appends one `<style>`
//! element to the document head.

use plaintag_dom::{Document, ElementId};

use crate::error::LifecycleError;

/// Append `css` to the head as a new `<style>` element.
///
/// `None` or blank text is reported as [`LifecycleError::StyleMissing`] and
/// nothing is injected.
pub fn inject_style(
    doc: &mut Document,
    component: &str,
    css: Option<String>,
) -> Result<ElementId, LifecycleError> {
    let css = css
        .filter(|css| !css.trim().is_empty())
        .ok_or_else(|| LifecycleError::StyleMissing(component.to_string()))?;

    let style = doc.create_element("style")?;
    doc.set_text_content(style, Some(&css))?;
    let head = doc.head();
    doc.append_child(head, style)?;

    tracing::debug!(component, bytes = css.len(), "injected component style");
    Ok(style)
}
