//! Diagnostic reporting
//!
//! Lifecycle failures never propagate as `Err`. They are wrapped in a
//! [`Diagnostic`] and handed to a [`DiagnosticSink`]. The default sink logs
//! through `tracing`; [`CollectingSink`] keeps them for inspection.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::LifecycleError;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Degraded but expected (e.g. a component without styles)
    Warning,
    /// A requested operation could not be carried out
    Error,
}

/// A reported failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub error: LifecycleError,
}

impl Diagnostic {
    pub fn warning(error: impl Into<LifecycleError>) -> Self {
        Self {
            severity: Severity::Warning,
            error: error.into(),
        }
    }

    pub fn error(error: impl Into<LifecycleError>) -> Self {
        Self {
            severity: Severity::Error,
            error: error.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

/// Receiver for lifecycle diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Logs diagnostics via `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => {
                tracing::warn!(kind = diagnostic.error.kind(), "{}", diagnostic)
            }
            Severity::Error => {
                tracing::error!(kind = diagnostic.error.kind(), "{}", diagnostic)
            }
        }
    }
}

/// Records diagnostics in memory and forwards them to `tracing`.
///
/// Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    diagnostics: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Reported errors without severity
    pub fn errors(&self) -> Vec<LifecycleError> {
        self.diagnostics().into_iter().map(|d| d.error).collect()
    }

    /// Remove and return everything reported so far
    pub fn take(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.lock().map(|d| d.is_empty()).unwrap_or(true)
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        TracingSink.report(diagnostic.clone());
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(diagnostic);
        }
    }
}
