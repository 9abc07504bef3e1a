//! Filtering of events by originating context.

use log::trace;

use crate::canvas::{CanvasEvent, ContextId, ScopedEvent};

/// Admits only events that originate from the bound context.
///
/// While nothing is bound every event is rejected.
#[derive(Debug, Default)]
pub struct EventScopeGuard {
    bound: Option<ContextId>,
}

impl EventScopeGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a context, returning the previously bound one.
    pub fn bind(&mut self, context: ContextId) -> Option<ContextId> {
        self.bound.replace(context)
    }

    /// Unbinds the current context, returning it.
    pub fn unbind(&mut self) -> Option<ContextId> {
        self.bound.take()
    }

    pub fn bound(&self) -> Option<ContextId> {
        self.bound
    }

    /// Returns `true` if `origin` is the bound context.
    pub fn admits(&self, origin: ContextId) -> bool {
        self.bound == Some(origin)
    }

    /// Unwraps `event` if it belongs to the bound context.
    pub fn admit(&self, event: &ScopedEvent) -> Option<CanvasEvent> {
        if self.admits(event.context()) {
            Some(event.event())
        } else {
            trace!(origin:% = event.context(), event:? = event.event(); "Dropping event from another context");
            None
        }
    }
}
