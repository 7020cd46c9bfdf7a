//! Component registry
//!
//! Maps component names to their builders. Registration overwrites; entries
//! are only dropped by an explicit [`ComponentRegistry::remove`].

use std::sync::Arc;

use plaintag_dom::Document;
use rustc_hash::FxHashMap;

use crate::instance::{ComponentInstance, Props};

/// Shared component builder
///
/// Runs while the manager holds the document lock. A builder must use the
/// `&mut Document` it is given and never lock a captured `SharedDocument`.
pub type ComponentBuilder =
    Arc<dyn Fn(&mut Document, Option<&Props>) -> Option<ComponentInstance> + Send + Sync>;

/// Name → builder mapping
#[derive(Default, Clone)]
pub struct ComponentRegistry {
    builders: FxHashMap<String, ComponentBuilder>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a builder. Returns the builder it replaced, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        builder: ComponentBuilder,
    ) -> Option<ComponentBuilder> {
        self.builders.insert(name.into(), builder)
    }

    pub fn get(&self, name: &str) -> Option<ComponentBuilder> {
        self.builders.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Deregister a component. Mounted instances stay in the document.
    pub fn remove(&mut self, name: &str) -> Option<ComponentBuilder> {
        self.builders.remove(name)
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.names())
            .finish()
    }
}
