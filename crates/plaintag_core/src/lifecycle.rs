//! Component lifecycle
//!
//! [`ComponentManager`] owns the registry and drives load/unload against a
//! shared document. Every check reports through the diagnostic sink and the
//! operation keeps going with whatever steps remain possible; nothing here
//! returns an error to the caller.
//!
//! Mounted instances are tracked only by their marker class (the component
//! name), so "what is mounted" is always answered by querying the document.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use plaintag_dom::{Document, ElementId, SharedDocument};
use rustc_hash::FxHashMap;

use crate::config::{LifecycleConfig, Position};
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::LifecycleError;
use crate::instance::{ComponentInstance, Hook, Props};
use crate::mount::MountWaiter;
use crate::registry::{ComponentBuilder, ComponentRegistry};
use crate::style::inject_style;

/// Registry plus load/unload against one document
pub struct ComponentManager {
    document: SharedDocument,
    registry: ComponentRegistry,
    config: LifecycleConfig,
    sink: Arc<dyn DiagnosticSink>,
    /// `unmounted` hooks of mounted roots, only populated with `run_hooks`
    unmount_hooks: Mutex<FxHashMap<ElementId, Hook>>,
}

impl ComponentManager {
    /// Manager with default config, reporting through `tracing`
    pub fn new(document: SharedDocument) -> Self {
        Self {
            document,
            registry: ComponentRegistry::new(),
            config: LifecycleConfig::default(),
            sink: Arc::new(TracingSink),
            unmount_hooks: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn with_config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn report(&self, diagnostic: Diagnostic) {
        self.sink.report(diagnostic);
    }

    /// Register a component.
    ///
    /// `style` runs immediately and its output is injected into the head once.
    /// An empty style is a warning. Registering an existing name replaces its
    /// builder; styles from the earlier registration stay in the head.
    ///
    /// `builder` runs with the document locked, so it must not lock the
    /// manager's [`SharedDocument`] itself.
    pub fn register<B, S>(&mut self, name: &str, builder: B, style: S)
    where
        B: Fn(&mut Document, Option<&Props>) -> Option<ComponentInstance> + Send + Sync + 'static,
        S: FnOnce() -> Option<String>,
    {
        self.register_shared(name, Arc::new(builder), style);
    }

    /// [`register`](Self::register) with an already shared builder
    pub fn register_shared<S>(&mut self, name: &str, builder: ComponentBuilder, style: S)
    where
        S: FnOnce() -> Option<String>,
    {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            self.report(Diagnostic::error(LifecycleError::InvalidArgumentType {
                what: "ComponentName",
                expected: "non-empty \"string\" without whitespace",
                found: format!("{name:?}"),
            }));
            return;
        }

        let css = style();
        let injected = inject_style(&mut *self.lock(), name, css);
        if let Err(err) = injected {
            self.report(Diagnostic::warning(err));
        }

        if self.registry.insert(name, builder).is_some() {
            tracing::debug!(component = name, "replaced registered component");
        } else {
            tracing::debug!(component = name, "registered component");
        }
    }

    /// Drop a component from the registry. Mounted instances are untouched.
    pub fn deregister(&mut self, name: &str) -> bool {
        self.registry.remove(name).is_some()
    }

    /// Load with the configured default parent and position
    pub async fn load_default(&self, name: &str, props: Option<Props>) {
        self.load(name, props, &self.config.parent, self.config.position.clone())
            .await;
    }

    /// Instantiate `name` and insert it under the first element matching `parent`.
    ///
    /// Waits for the mount root first. Registry, parent, and element checks
    /// are each reported independently; the element is inserted only when all
    /// of them pass.
    pub async fn load(
        &self,
        name: &str,
        props: Option<Props>,
        parent: &str,
        position: impl Into<Position>,
    ) {
        let position = position.into();
        tracing::debug!(component = name, "started component load 1/4");

        let waiter = MountWaiter::new(&self.document, self.config.mount_timeout());
        if waiter.wait().await.is_err() {
            self.report(Diagnostic::error(LifecycleError::MountTimeout(
                name.to_string(),
            )));
            return;
        }

        let builder = self.registry.get(name);
        if builder.is_none() {
            self.report(Diagnostic::error(LifecycleError::ComponentObjectMissing(
                name.to_string(),
            )));
        }

        let mut doc = self.lock();
        let parent_el = match doc.query_selector(parent) {
            Ok(found) => found,
            Err(err) => {
                tracing::debug!(component = name, "{}", err);
                None
            }
        };
        if parent_el.is_none() {
            self.report(Diagnostic::error(LifecycleError::ParentMissing(
                name.to_string(),
            )));
        }

        tracing::debug!(component = name, "loading component 2/4");

        let Some(builder) = builder else {
            return;
        };
        let instance = builder(&mut *doc, props.as_ref()).filter(|i| doc.contains(i.element));
        let Some(instance) = instance else {
            self.report(Diagnostic::error(LifecycleError::ComponentElementMissing(
                name.to_string(),
            )));
            return;
        };

        let element = instance.element;
        let Some(parent_el) = parent_el else {
            // Built but nowhere to go
            if !doc.is_connected(element) {
                let _ = doc.remove(element);
            }
            return;
        };

        if let Err(err) = doc.add_class(element, name) {
            self.report(Diagnostic::error(err));
            return;
        }

        tracing::debug!(component = name, "visualizing component 3/4");

        match &position {
            Position::Append => {
                if let Err(err) = doc.append_child(parent_el, element) {
                    self.report(Diagnostic::error(err));
                    return;
                }
            }
            Position::Other(other) => {
                tracing::debug!(component = name, position = %other, "position has no effect");
                if !doc.is_connected(element) {
                    let _ = doc.remove(element);
                }
                return;
            }
        }

        if self.config.run_hooks {
            self.run_mount_hooks(&mut *doc, instance);
        }

        tracing::debug!(component = name, "visualized component 4/4");
    }

    fn run_mount_hooks(&self, doc: &mut Document, instance: ComponentInstance) {
        let ComponentInstance {
            element,
            mounted,
            unmounted,
        } = instance;

        if let Some(unmounted) = unmounted {
            self.hooks().insert(element, unmounted);
        }
        if let Some(mounted) = mounted {
            mounted(doc, element);
        }
    }

    fn hooks(&self) -> MutexGuard<'_, FxHashMap<ElementId, Hook>> {
        self.unmount_hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Unload with the configured default for `unload_all`
    pub fn unload_default(&self, name: &str) {
        self.unload(name, self.config.unload_all);
    }

    /// Remove the first mounted instance of `name`, or all of them.
    ///
    /// Removal works from marker classes alone, so stale instances of a
    /// deregistered component are still removed (after reporting it missing).
    pub fn unload(&self, name: &str, unload_all: bool) {
        tracing::debug!(component = name, "unloading component 1/3");

        if !self.registry.contains(name) {
            self.report(Diagnostic::error(LifecycleError::ComponentObjectMissing(
                name.to_string(),
            )));
        }

        tracing::debug!(component = name, "unloading component 2/3");

        let mut doc = self.lock();
        let mut targets = doc.get_elements_by_class_name(name);
        if !unload_all {
            targets.truncate(1);
        }
        if targets.is_empty() {
            tracing::debug!(component = name, "no mounted instance to unload");
            return;
        }

        for id in targets {
            // Nested instances go away with their ancestor
            if !doc.contains(id) {
                continue;
            }
            if let Err(err) = doc.remove(id) {
                self.report(Diagnostic::error(err));
            }
        }

        if self.config.run_hooks {
            self.run_unmount_hooks(&mut *doc);
        }

        tracing::debug!(component = name, "unloaded component 3/3");
    }

    /// Fire `unmounted` for every hooked root that is no longer in the arena
    fn run_unmount_hooks(&self, doc: &mut Document) {
        let gone: Vec<(ElementId, Hook)> = {
            let mut hooks = self.hooks();
            let dead: Vec<ElementId> = hooks
                .keys()
                .copied()
                .filter(|&id| !doc.contains(id))
                .collect();
            dead.into_iter()
                .filter_map(|id| hooks.remove(&id).map(|hook| (id, hook)))
                .collect()
        };

        for (id, hook) in gone {
            hook(doc, id);
        }
    }

    /// Mounted roots of `name` in document order
    pub fn mounted(&self, name: &str) -> Vec<ElementId> {
        self.lock().get_elements_by_class_name(name)
    }
}

impl std::fmt::Debug for ComponentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentManager")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
