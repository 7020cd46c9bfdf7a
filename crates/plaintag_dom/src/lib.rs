//! PlainTag Document Model
//!
//! The element tree components are mounted into:
//!
//! - **Document**: slotmap-backed element arena with `html`, `head` and a
//!   mount root (`body`) that may appear after construction
//! - **Selectors**: `querySelector`-style lookups over the live tree
//! - **Helpers**: the primitive calls component builders make
//!
//! # Example
//!
//! ```rust
//! use plaintag_dom::{helpers, Document};
//!
//! let mut doc = Document::new();
//! let card = helpers::make(&mut doc, "div").unwrap();
//! helpers::insert_in(&mut doc, card, "h2", Some("Hello"));
//! helpers::class_set(&mut doc, card, "card");
//!
//! let body = doc.body().unwrap();
//! doc.append_child(body, card).unwrap();
//! assert_eq!(doc.query_selector("body > .card").unwrap(), Some(card));
//! ```

pub mod document;
pub mod error;
pub mod helpers;
pub mod selector;
pub mod signal;

pub use document::{Document, Element, ElementId, SharedDocument};
pub use error::{DomError, Result};
pub use helpers::InsertTag;
pub use selector::{Combinator, CompoundSelector, Selector, SelectorPart};
pub use signal::{MountSignal, SharedMountSignal};
