//! Component instances
//!
//! A builder returns a [`ComponentInstance`]: the root element to mount plus
//! optional lifecycle hooks.

use std::fmt;

use plaintag_dom::{Document, ElementId};

/// Props passed to component builders
pub type Props = serde_json::Value;

/// Lifecycle hook, called with the document and the instance's root element
pub type Hook = Box<dyn FnOnce(&mut Document, ElementId) + Send>;

/// Result of invoking a component builder
pub struct ComponentInstance {
    pub element: ElementId,
    pub mounted: Option<Hook>,
    pub unmounted: Option<Hook>,
}

impl ComponentInstance {
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            mounted: None,
            unmounted: None,
        }
    }

    /// Hook run after the element is inserted
    pub fn with_mounted(
        mut self,
        hook: impl FnOnce(&mut Document, ElementId) + Send + 'static,
    ) -> Self {
        self.mounted = Some(Box::new(hook));
        self
    }

    /// Hook run after the element is removed by an unload
    pub fn with_unmounted(
        mut self,
        hook: impl FnOnce(&mut Document, ElementId) + Send + 'static,
    ) -> Self {
        self.unmounted = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("element", &self.element)
            .field("mounted", &self.mounted.is_some())
            .field("unmounted", &self.unmounted.is_some())
            .finish()
    }
}

/// Package a builder's root element, or `None` when it has none
pub fn parse(element: Option<ElementId>) -> Option<ComponentInstance> {
    element.map(ComponentInstance::new)
}
