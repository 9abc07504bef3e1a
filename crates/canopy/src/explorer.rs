//! Tree explorer session.
//!
//! An [`Explorer`] is bound to at most one canvas at a time. Binding
//! rebuilds the tree from that canvas' graph; afterwards the host forwards
//! every canvas notification to [`Explorer::handle`], which drops traffic
//! from other canvases and dispatches the rest to the sync controller or the
//! selection coordinator.

use log::{debug, info, warn};

use canopy_core::{graph::ContainmentGraph, identifier::Id};

use crate::{
    canvas::{Canvas, CanvasEvent, ContextId, ScopedEvent},
    config::ExplorerConfig,
    glyph::{DefinitionGlyphs, GlyphResolver},
    scope::EventScopeGuard,
    selection::SelectionCoordinator,
    sync::TreeSyncController,
    tree::{Projection, TreeView},
};

/// Tree explorer bound to a single canvas context.
///
/// # Examples
///
/// ```
/// use canopy::{
///     Explorer,
///     canvas::{Canvas, CanvasEvent, ContextId, ScopedEvent},
///     config::ExplorerConfig,
/// };
/// use canopy_core::{
///     definition::Definition,
///     graph::{EdgeKind, Graph},
///     identifier::Id,
/// };
///
/// struct Editor {
///     graph: Graph,
/// }
///
/// impl Canvas for Editor {
///     type Graph = Graph;
///
///     fn context_id(&self) -> ContextId {
///         ContextId::new("editor")
///     }
///
///     fn graph(&self) -> Option<&Graph> {
///         Some(&self.graph)
///     }
///
///     fn has_shape(&self, id: Id) -> bool {
///         self.graph.node(id).is_some()
///     }
/// }
///
/// let mut editor = Editor { graph: Graph::new() };
/// let pool = Id::new("pool");
/// editor.graph.add_node(pool, Definition::new("Pool").with_name("Sales"));
///
/// let mut explorer = Explorer::new(ExplorerConfig::default());
/// explorer.bind(&editor);
///
/// let task = Id::new("task");
/// editor.graph.add_node(task, Definition::new("Task").with_title("Task"));
/// editor.graph.add_edge(pool, task, EdgeKind::Child).unwrap();
/// explorer.handle(
///     &editor,
///     &ScopedEvent::new(ContextId::new("editor"), CanvasEvent::ElementAdded(task)),
/// );
///
/// assert_eq!(explorer.view().to_string(), "v Sales [Pool]\n  - Task [Task]\n");
/// ```
#[derive(Debug)]
pub struct Explorer<V = Projection, R = DefinitionGlyphs> {
    sync: TreeSyncController<V, R>,
    selection: SelectionCoordinator,
    guard: EventScopeGuard,
}

impl Explorer {
    /// Creates an explorer over an in-memory [`Projection`].
    pub fn new(config: ExplorerConfig) -> Self {
        Self::with_view(Projection::new(), DefinitionGlyphs, config)
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(ExplorerConfig::default())
    }
}

impl<V, R> Explorer<V, R>
where
    V: TreeView,
    R: GlyphResolver,
{
    /// Creates an explorer driving a host-provided view and glyph resolver.
    pub fn with_view(view: V, glyphs: R, config: ExplorerConfig) -> Self {
        Self {
            sync: TreeSyncController::new(view, glyphs, config),
            selection: SelectionCoordinator::new(),
            guard: EventScopeGuard::new(),
        }
    }

    pub fn view(&self) -> &V {
        self.sync.view()
    }

    pub fn view_mut(&mut self) -> &mut V {
        self.sync.view_mut()
    }

    pub fn config(&self) -> &ExplorerConfig {
        self.sync.config()
    }

    /// The currently bound context.
    pub fn bound_context(&self) -> Option<ContextId> {
        self.guard.bound()
    }

    /// The currently selected id.
    pub fn selected(&self) -> Option<Id> {
        self.selection.selected()
    }

    /// Binds the explorer to `canvas` and shows its diagram.
    ///
    /// Any previous projection and selection are discarded. A canvas
    /// without a diagram is bound but shows nothing.
    pub fn bind<C: Canvas>(&mut self, canvas: &C) {
        let context = canvas.context_id();
        if let Some(previous) = self.guard.bind(context) {
            debug!(previous:%, context:%; "Replacing bound context");
        }

        self.selection.reset();
        self.sync.cleared();

        match canvas.graph() {
            Some(graph) => self.sync.rebuild(graph),
            None => debug!(context:%; "Canvas has no diagram to show"),
        }

        info!(context:%; "Explorer bound");
    }

    /// Unbinds the explorer. The tree is emptied and later events are ignored.
    pub fn unbind(&mut self) {
        if let Some(context) = self.guard.unbind() {
            self.selection.reset();
            self.sync.cleared();
            info!(context:%; "Explorer unbound");
        }
    }

    /// Handles a notification coming from a canvas.
    ///
    /// `canvas` must be the bound canvas; events scoped to any other context
    /// are dropped.
    pub fn handle<C: Canvas>(&mut self, canvas: &C, event: &ScopedEvent) {
        let Some(event) = self.guard.admit(event) else {
            return;
        };
        if !self.guard.admits(canvas.context_id()) {
            warn!(canvas:% = canvas.context_id(); "Event handled against a canvas that is not bound");
            return;
        }

        debug!(event:?; "Handling canvas event");
        match event {
            CanvasEvent::ElementSelected(id) => {
                self.selection.canvas_selected(self.sync.view_mut(), id);
                return;
            }
            CanvasEvent::CanvasCleared => {
                self.selection.reset();
                self.sync.cleared();
                return;
            }
            CanvasEvent::ElementsCleared => {
                self.selection.reset();
                if let Some(graph) = Self::graph_of(canvas) {
                    self.sync.rebuild(graph);
                }
                return;
            }
            CanvasEvent::ElementRemoved(id) => self.sync.node_removed(id),
            CanvasEvent::ElementAdded(id) => {
                if let Some(graph) = Self::graph_of(canvas) {
                    self.sync.node_added(graph, graph.parent(id), id);
                }
            }
            CanvasEvent::ElementUpdated(id) => {
                if let Some(graph) = Self::graph_of(canvas) {
                    self.sync.node_updated(graph, id);
                }
            }
        }

        // Adds, updates and removals may re-insert or drop the selected item.
        self.selection.restore(self.sync.view_mut());
    }

    /// Handles a click on a tree item.
    ///
    /// Returns the selection notification the host should broadcast, or
    /// `None` if the item has no shape on the canvas or the canvas is not
    /// bound.
    pub fn item_clicked<C: Canvas>(&self, canvas: &C, id: Id) -> Option<ScopedEvent> {
        if !self.guard.admits(canvas.context_id()) {
            debug!(id:%; "Click ignored; canvas is not bound");
            return None;
        }
        self.selection.item_clicked(canvas, id)
    }

    fn graph_of<C: Canvas>(canvas: &C) -> Option<&C::Graph> {
        let graph = canvas.graph();
        if graph.is_none() {
            debug!("Canvas has no diagram; event ignored");
        }
        graph
    }
}
