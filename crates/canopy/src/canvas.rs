//! Canvas contexts and the events they emit.
//!
//! A canvas is one diagram editing session. Everything it reports to the
//! explorer is wrapped in a [`ScopedEvent`] naming the originating context,
//! so an explorer bound to one canvas can ignore traffic from the others.

use std::fmt;

use canopy_core::{graph::ContainmentGraph, identifier::Id};

/// Identity of a canvas session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Id);

impl ContextId {
    pub fn new(id: impl Into<Id>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> Id {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The host-side canvas the explorer is bound to.
pub trait Canvas {
    type Graph: ContainmentGraph;

    /// Identity used to scope events.
    fn context_id(&self) -> ContextId;

    /// The diagram graph, or `None` if no diagram is loaded.
    fn graph(&self) -> Option<&Self::Graph>;

    /// Returns `true` if a drawable shape exists for the element.
    fn has_shape(&self, id: Id) -> bool;
}

/// Notification emitted by a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasEvent {
    /// A node was added to the graph.
    ElementAdded(Id),
    /// A node's content or children changed.
    ElementUpdated(Id),
    /// A node was removed from the graph.
    ElementRemoved(Id),
    /// The canvas dropped and redrew all its elements.
    ElementsCleared,
    /// The canvas itself was cleared.
    CanvasCleared,
    /// An element became the selected one.
    ElementSelected(Id),
}

/// A [`CanvasEvent`] tagged with the context it originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopedEvent {
    context: ContextId,
    event: CanvasEvent,
}

impl ScopedEvent {
    pub fn new(context: ContextId, event: CanvasEvent) -> Self {
        Self { context, event }
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn event(&self) -> CanvasEvent {
        self.event
    }
}
