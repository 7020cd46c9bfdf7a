//! PlainTag Core Runtime
//!
//! Registers named component builders, mounts their instances into a
//! document, and removes them again:
//!
//! - **Registry**: name → builder, owned by a [`ComponentManager`]
//! - **Style Injection**: one `<style>` element per registration
//! - **Mount Waiting**: loads suspend until the document body exists
//! - **Lifecycle**: `load` / `unload` with best-effort diagnostics
//!
//! # Example
//!
//! ```rust
//! use plaintag_core::{parse, ComponentManager};
//! use plaintag_dom::{helpers, Document};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let mut manager = ComponentManager::new(Document::new().into_shared());
//!
//! manager.register(
//!     "greeting",
//!     |doc, props| {
//!         let name = props
//!             .and_then(|p| p.get("name"))
//!             .and_then(|n| n.as_str())
//!             .unwrap_or("world");
//!         let root = helpers::make(doc, "div")?;
//!         helpers::insert_in(doc, root, "h2", Some(&format!("Hello {name}")));
//!         parse(Some(root))
//!     },
//!     || Some(".greeting { padding: 4%; }".to_string()),
//! );
//!
//! manager
//!     .load_default("greeting", Some(serde_json::json!({ "name": "Ada" })))
//!     .await;
//! assert_eq!(manager.mounted("greeting").len(), 1);
//!
//! manager.unload_default("greeting");
//! assert!(manager.mounted("greeting").is_empty());
//! # });
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod instance;
pub mod lifecycle;
pub mod mount;
pub mod registry;
pub mod style;

pub use config::{LifecycleConfig, Position};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Severity, TracingSink};
pub use error::LifecycleError;
pub use instance::{parse, ComponentInstance, Hook, Props};
pub use lifecycle::ComponentManager;
pub use mount::{MountTimedOut, MountWaiter};
pub use registry::{ComponentBuilder, ComponentRegistry};
pub use style::inject_style;
