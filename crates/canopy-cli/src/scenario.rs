//! Scripted diagram sessions.
//!
//! A scenario describes an initial diagram and a list of steps that mutate
//! it the way an editor would. Replaying a scenario applies each mutation to
//! an in-memory canvas and forwards the matching notification to an
//! [`Explorer`], so the final outline shows what a user would see.
//!
//! ```toml
//! context = "diagram"
//!
//! [[nodes]]
//! id = "pool"
//! definition = "Pool"
//! name = "Sales"
//!
//! [[nodes]]
//! id = "lane"
//! definition = "Lane"
//!
//! [[edges]]
//! parent = "pool"
//! child = "lane"
//!
//! [[steps]]
//! op = "add"
//! id = "task"
//! definition = "Task"
//! title = "Task"
//! parent = "lane"
//!
//! [[steps]]
//! op = "select"
//! id = "task"
//! ```

use std::collections::HashSet;

use log::{debug, info};
use serde::Deserialize;

use canopy::{
    CanopyError, Explorer,
    canvas::{Canvas, CanvasEvent, ContextId, ScopedEvent},
    definition::Definition,
    graph::{EdgeKind, Graph, GraphError},
    identifier::Id,
};

fn default_context() -> Id {
    Id::new("diagram")
}

fn default_shape() -> bool {
    true
}

/// A parsed scenario file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default = "default_context")]
    context: Id,

    #[serde(default)]
    nodes: Vec<NodeSpec>,

    #[serde(default)]
    edges: Vec<EdgeSpec>,

    #[serde(default)]
    steps: Vec<Step>,
}

/// A node of the initial diagram.
#[derive(Debug, Deserialize)]
struct NodeSpec {
    id: Id,

    #[serde(flatten)]
    definition: Definition,

    /// Whether the node is drawn on the canvas.
    #[serde(default = "default_shape")]
    shape: bool,
}

/// An edge of the initial diagram.
#[derive(Debug, Deserialize)]
struct EdgeSpec {
    parent: Id,
    child: Id,
    #[serde(default)]
    kind: EdgeKind,
}

/// One editing step.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum Step {
    /// Adds a node, optionally under a parent, and reports it.
    Add {
        id: Id,
        definition: Id,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        parent: Option<Id>,
        #[serde(default = "default_shape")]
        shape: bool,
    },
    /// Adds an edge without reporting anything.
    Link {
        parent: Id,
        child: Id,
        #[serde(default)]
        kind: EdgeKind,
    },
    /// Sets or clears the `name` property and reports an update.
    Rename {
        id: Id,
        #[serde(default)]
        name: Option<String>,
    },
    /// Reports an update without changing the graph.
    Update { id: Id },
    /// Removes a node and reports it.
    Remove { id: Id },
    /// Reports that every element was redrawn.
    Redraw,
    /// Reports that the canvas was cleared. The graph is kept.
    Reset,
    /// Selects an element on the canvas.
    Select { id: Id },
    /// Clicks a tree item; the resulting notification is fed back.
    Click { id: Id },
}

impl Scenario {
    /// Parses a scenario from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::Scenario`] with the offending span when the
    /// source is not a valid scenario.
    pub fn parse(source: &str) -> Result<Self, CanopyError> {
        toml::from_str(source)
            .map_err(|err| CanopyError::new_scenario_error(err.message(), err.span(), source))
    }

    /// Number of scripted steps.
    pub fn steps_count(&self) -> usize {
        self.steps.len()
    }

    /// Builds the initial canvas.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::Graph`] if an edge refers to an unknown node or
    /// breaks the containment rules.
    pub fn canvas(&self) -> Result<ScenarioCanvas, CanopyError> {
        let mut canvas = ScenarioCanvas::new(ContextId::new(self.context));
        for node in &self.nodes {
            canvas.insert(node.id, node.definition.clone(), node.shape);
        }
        for edge in &self.edges {
            canvas.graph.add_edge(edge.parent, edge.child, edge.kind)?;
        }
        Ok(canvas)
    }

    /// Binds `explorer` to `canvas` and replays every step.
    ///
    /// # Errors
    ///
    /// Returns [`CanopyError::Graph`] if a step cannot be applied to the
    /// graph. Failures inside the explorer are never errors.
    pub fn replay(
        &self,
        canvas: &mut ScenarioCanvas,
        explorer: &mut Explorer,
    ) -> Result<(), CanopyError> {
        explorer.bind(&*canvas);

        for (index, step) in self.steps.iter().enumerate() {
            debug!(step = index, op:? = step; "Replaying step");
            if let Some(event) = canvas.apply(step, explorer)? {
                explorer.handle(&*canvas, &event);
            }
        }

        info!(steps = self.steps_count(), items = explorer.view().len(); "Scenario replayed");
        Ok(())
    }
}

/// In-memory canvas driven by a scenario.
#[derive(Debug)]
pub struct ScenarioCanvas {
    context: ContextId,
    graph: Graph,
    shapes: HashSet<Id>,
}

impl ScenarioCanvas {
    fn new(context: ContextId) -> Self {
        Self {
            context,
            graph: Graph::new(),
            shapes: HashSet::new(),
        }
    }

    fn insert(&mut self, id: Id, definition: Definition, shape: bool) {
        self.graph.add_node(id, definition);
        if shape {
            self.shapes.insert(id);
        }
    }

    fn event(&self, event: CanvasEvent) -> ScopedEvent {
        ScopedEvent::new(self.context, event)
    }

    /// Applies a step to the graph and returns the notification to send.
    fn apply(
        &mut self,
        step: &Step,
        explorer: &Explorer,
    ) -> Result<Option<ScopedEvent>, CanopyError> {
        let event = match step {
            Step::Add {
                id,
                definition,
                name,
                title,
                parent,
                shape,
            } => {
                let mut content = Definition::new(*definition);
                if let Some(name) = name {
                    content = content.with_name(name.as_str());
                }
                if let Some(title) = title {
                    content = content.with_title(title.as_str());
                }
                self.insert(*id, content, *shape);
                if let Some(parent) = parent {
                    self.graph.add_edge(*parent, *id, EdgeKind::Child)?;
                }
                Some(self.event(CanvasEvent::ElementAdded(*id)))
            }
            Step::Link {
                parent,
                child,
                kind,
            } => {
                self.graph.add_edge(*parent, *child, *kind)?;
                None
            }
            Step::Rename { id, name } => {
                let node = self
                    .graph
                    .node_mut(*id)
                    .ok_or(GraphError::UnknownNode(*id))?;
                node.set_name(name.clone());
                Some(self.event(CanvasEvent::ElementUpdated(*id)))
            }
            Step::Update { id } => Some(self.event(CanvasEvent::ElementUpdated(*id))),
            Step::Remove { id } => {
                self.graph
                    .remove_node(*id)
                    .ok_or(GraphError::UnknownNode(*id))?;
                self.shapes.remove(id);
                Some(self.event(CanvasEvent::ElementRemoved(*id)))
            }
            Step::Redraw => Some(self.event(CanvasEvent::ElementsCleared)),
            Step::Reset => Some(self.event(CanvasEvent::CanvasCleared)),
            Step::Select { id } => Some(self.event(CanvasEvent::ElementSelected(*id))),
            Step::Click { id } => explorer.item_clicked(&*self, *id),
        };
        Ok(event)
    }
}

impl Canvas for ScenarioCanvas {
    type Graph = Graph;

    fn context_id(&self) -> ContextId {
        self.context
    }

    fn graph(&self) -> Option<&Graph> {
        Some(&self.graph)
    }

    fn has_shape(&self, id: Id) -> bool {
        self.shapes.contains(&id)
    }
}
