//! Attributed directed graph with containment edges.
//!
//! A diagram is modeled as a directed graph whose nodes carry a
//! [`Definition`] and whose edges carry an [`EdgeKind`]. Only
//! [`EdgeKind::Child`] edges describe structure ("is a structural child of");
//! the other kinds are relations the explorer ignores.
//!
//! # Architecture
//!
//! - [`ContainmentGraph`]: the read-only view the explorer consumes
//! - [`Graph`]: mutable in-memory implementation used by hosts and tests
//! - [`EdgeIndex`]: handle to an edge, stable until the edge is removed;
//!   the slot may then be reused by a later edge
//!
//! Capabilities:
//! - Node storage in insertion order, so root enumeration is deterministic
//! - Tracking of both incoming and outgoing edges per node
//! - Root detection (nodes with no incoming containment edge)
//! - At most one containment parent per node

use std::collections::HashMap;

use indexmap::IndexMap;
use log::trace;
use serde::Deserialize;
use thiserror::Error;

use crate::{definition::Definition, identifier::Id};

/// Errors raised while mutating a [`Graph`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Unknown node `{0}`")]
    UnknownNode(Id),

    #[error("Node `{child}` is already contained by `{parent}`")]
    MultipleParents { child: Id, parent: Id },

    #[error("Node `{0}` cannot contain itself")]
    SelfContainment(Id),
}

/// Kind of a directed edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Containment: the target is a structural child of the source.
    #[default]
    Child,
    /// The target is docked onto the source.
    Dock,
    /// A connector between two nodes.
    Connection,
}

impl EdgeKind {
    pub fn is_containment(self) -> bool {
        self == Self::Child
    }
}

/// Handle to an edge in a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeIndex(usize);

/// A directed edge in the graph.
#[derive(Debug, Clone, Copy)]
struct Edge {
    source: Id,
    target: Id,
    kind: EdgeKind,
}

/// Read-only containment view of a diagram graph.
///
/// This is everything the explorer needs from the graph: identity, content
/// and ordered containment enumeration. Implementations must return children
/// in the stable source order of the node's outgoing containment edges.
pub trait ContainmentGraph {
    /// Checks if a node with the given ID exists.
    fn contains(&self, id: Id) -> bool;

    /// Returns the definition payload of a node.
    fn definition(&self, id: Id) -> Option<&Definition>;

    /// Returns the containment children of a node, in edge order.
    fn children(&self, id: Id) -> impl Iterator<Item = Id> + '_;

    /// Returns the containment parent of a node, if it has one.
    fn parent(&self, id: Id) -> Option<Id>;

    /// Returns the nodes without a containment parent, in a stable order.
    fn roots(&self) -> impl Iterator<Item = Id> + '_;

    /// Returns the number of containment children of a node.
    fn child_count(&self, id: Id) -> usize {
        self.children(id).count()
    }

    /// Returns `true` if the node has at least one containment child.
    fn has_children(&self, id: Id) -> bool {
        self.children(id).next().is_some()
    }
}

/// In-memory diagram graph.
///
/// The graph is directed and allows any number of non-containment edges
/// between nodes. Edge storage is a slot vector: removing an edge frees its
/// slot without shifting the indices of the others, and the next added edge
/// takes the most recently freed slot, so storage is bounded by the peak
/// number of live edges.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: IndexMap<Id, Definition>,
    edges: Vec<Option<Edge>>,
    free_edges: Vec<EdgeIndex>,
    incoming_edges: HashMap<Id, Vec<EdgeIndex>>,
    outgoing_edges: HashMap<Id, Vec<EdgeIndex>>,
}

impl Graph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the definition of the node with the given ID, if it exists.
    pub fn node(&self, id: Id) -> Option<&Definition> {
        self.nodes.get(&id)
    }

    /// Returns a mutable reference to a node's definition.
    pub fn node_mut(&mut self, id: Id) -> Option<&mut Definition> {
        self.nodes.get_mut(&id)
    }

    /// Returns an iterator over all node IDs in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.nodes.keys().copied()
    }

    /// Returns the total number of nodes in the graph.
    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of live edges in the graph.
    pub fn edges_count(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    /// Returns an iterator over all live edges as `(source, target, kind)`.
    pub fn edges(&self) -> impl Iterator<Item = (Id, Id, EdgeKind)> + '_ {
        self.edges
            .iter()
            .flatten()
            .map(|edge| (edge.source, edge.target, edge.kind))
    }

    /// Adds a node to the graph with the given ID and definition.
    ///
    /// If a node with the same ID already exists its definition is replaced
    /// (keeping its position and edges) and the previous one is returned.
    pub fn add_node(&mut self, id: Id, definition: Definition) -> Option<Definition> {
        self.nodes.insert(id, definition)
    }

    /// Replaces the definition of an existing node, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if the node does not exist.
    pub fn update_definition(
        &mut self,
        id: Id,
        definition: Definition,
    ) -> Result<Definition, GraphError> {
        let slot = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        Ok(std::mem::replace(slot, definition))
    }

    /// Adds a directed edge between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is unknown, or if a containment
    /// edge would give the target a second parent or make a node its own
    /// child.
    pub fn add_edge(
        &mut self,
        source_id: Id,
        target_id: Id,
        kind: EdgeKind,
    ) -> Result<EdgeIndex, GraphError> {
        if !self.nodes.contains_key(&source_id) {
            return Err(GraphError::UnknownNode(source_id));
        }
        if !self.nodes.contains_key(&target_id) {
            return Err(GraphError::UnknownNode(target_id));
        }
        if kind.is_containment() {
            if source_id == target_id {
                return Err(GraphError::SelfContainment(source_id));
            }
            if let Some(parent) = ContainmentGraph::parent(self, target_id) {
                return Err(GraphError::MultipleParents {
                    child: target_id,
                    parent,
                });
            }
        }

        let edge = Edge {
            source: source_id,
            target: target_id,
            kind,
        };
        let idx = match self.free_edges.pop() {
            Some(idx) => {
                self.edges[idx.0] = Some(edge);
                idx
            }
            None => {
                self.edges.push(Some(edge));
                EdgeIndex(self.edges.len() - 1)
            }
        };
        self.outgoing_edges.entry(source_id).or_default().push(idx);
        self.incoming_edges.entry(target_id).or_default().push(idx);
        Ok(idx)
    }

    /// Removes an edge, returning its endpoints and kind.
    pub fn remove_edge(&mut self, idx: EdgeIndex) -> Option<(Id, Id, EdgeKind)> {
        let edge = self.edges.get_mut(idx.0)?.take()?;
        Self::detach(&mut self.outgoing_edges, edge.source, idx);
        Self::detach(&mut self.incoming_edges, edge.target, idx);
        self.free_edges.push(idx);
        Some((edge.source, edge.target, edge.kind))
    }

    /// Removes a node and every edge touching it.
    ///
    /// Children of the removed node lose their containment parent and
    /// become roots.
    pub fn remove_node(&mut self, id: Id) -> Option<Definition> {
        let definition = self.nodes.shift_remove(&id)?;

        let touching: Vec<EdgeIndex> = self
            .outgoing_edges
            .get(&id)
            .into_iter()
            .chain(self.incoming_edges.get(&id))
            .flatten()
            .copied()
            .collect();
        for idx in touching {
            self.remove_edge(idx);
        }
        self.outgoing_edges.remove(&id);
        self.incoming_edges.remove(&id);

        trace!(id:%; "Removed graph node");
        Some(definition)
    }

    /// Removes every node and edge.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.free_edges.clear();
        self.incoming_edges.clear();
        self.outgoing_edges.clear();
    }

    fn detach(index: &mut HashMap<Id, Vec<EdgeIndex>>, node: Id, idx: EdgeIndex) {
        if let Some(list) = index.get_mut(&node) {
            list.retain(|candidate| *candidate != idx);
            if list.is_empty() {
                index.remove(&node);
            }
        }
    }

    fn edge(&self, idx: EdgeIndex) -> Option<&Edge> {
        self.edges.get(idx.0).and_then(Option::as_ref)
    }
}

impl ContainmentGraph for Graph {
    fn contains(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    fn definition(&self, id: Id) -> Option<&Definition> {
        self.nodes.get(&id)
    }

    fn children(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        self.outgoing_edges
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|idx| self.edge(*idx))
            .filter(|edge| edge.kind.is_containment())
            .map(|edge| edge.target)
    }

    fn parent(&self, id: Id) -> Option<Id> {
        self.incoming_edges
            .get(&id)?
            .iter()
            .filter_map(|idx| self.edge(*idx))
            .find(|edge| edge.kind.is_containment())
            .map(|edge| edge.source)
    }

    fn roots(&self) -> impl Iterator<Item = Id> + '_ {
        self.nodes
            .keys()
            .copied()
            .filter(|id| ContainmentGraph::parent(self, *id).is_none())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn task(name: &str) -> Definition {
        Definition::new("Task").with_name(name)
    }

    fn graph_with(ids: &[&str]) -> Graph {
        let mut graph = Graph::new();
        for id in ids {
            graph.add_node(Id::new(id), task(id));
        }
        graph
    }

    #[test]
    fn test_graph_new() {
        let graph = Graph::new();

        assert_eq!(graph.nodes_count(), 0);
        assert_eq!(graph.edges_count(), 0);
        assert_eq!(graph.roots().count(), 0);
    }

    #[test]
    fn test_add_node() {
        let graph = graph_with(&["node1", "node2"]);

        assert_eq!(graph.nodes_count(), 2);
        assert!(graph.contains(Id::new("node1")));
        assert_eq!(graph.node(Id::new("node2")).and_then(|d| d.name()), Some("node2"));
        assert!(graph.node(Id::new("missing")).is_none());
    }

    #[test]
    fn test_node_replacement_keeps_position_and_edges() {
        let mut graph = graph_with(&["a", "b"]);
        let (a, b) = (Id::new("a"), Id::new("b"));
        graph.add_edge(a, b, EdgeKind::Child).unwrap();

        let previous = graph.add_node(a, task("renamed"));

        assert_eq!(previous.and_then(|d| d.name().map(str::to_owned)), Some("a".into()));
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(graph.children(a).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_add_edge_unknown_endpoint() {
        let mut graph = graph_with(&["a"]);
        let err = graph
            .add_edge(Id::new("a"), Id::new("ghost"), EdgeKind::Child)
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownNode(Id::new("ghost")));
    }

    #[test]
    fn test_containment_rejects_second_parent() {
        let mut graph = graph_with(&["p1", "p2", "c"]);
        let (p1, p2, c) = (Id::new("p1"), Id::new("p2"), Id::new("c"));
        graph.add_edge(p1, c, EdgeKind::Child).unwrap();

        let err = graph.add_edge(p2, c, EdgeKind::Child).unwrap_err();
        assert_eq!(err, GraphError::MultipleParents { child: c, parent: p1 });

        // Non-containment edges are unrestricted.
        graph.add_edge(p2, c, EdgeKind::Connection).unwrap();
        assert_eq!(graph.parent(c), Some(p1));
    }

    #[test]
    fn test_containment_rejects_self_loop() {
        let mut graph = graph_with(&["a"]);
        let a = Id::new("a");
        assert_eq!(
            graph.add_edge(a, a, EdgeKind::Child),
            Err(GraphError::SelfContainment(a))
        );
        assert!(graph.add_edge(a, a, EdgeKind::Connection).is_ok());
        assert_eq!(graph.roots().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_roots_ignore_non_containment_edges() {
        let mut graph = graph_with(&["root1", "root2", "child"]);
        let (r1, r2, c) = (Id::new("root1"), Id::new("root2"), Id::new("child"));
        graph.add_edge(r1, c, EdgeKind::Child).unwrap();
        graph.add_edge(c, r2, EdgeKind::Connection).unwrap();
        graph.add_edge(r1, r2, EdgeKind::Dock).unwrap();

        assert_eq!(graph.roots().collect::<Vec<_>>(), vec![r1, r2]);
    }

    #[test]
    fn test_children_follow_edge_order() {
        let mut graph = graph_with(&["p", "z", "a", "m"]);
        let p = Id::new("p");
        for child in ["z", "a", "m"] {
            graph.add_edge(p, Id::new(child), EdgeKind::Child).unwrap();
        }
        graph.add_edge(p, Id::new("a"), EdgeKind::Connection).unwrap();

        let children: Vec<Id> = graph.children(p).collect();
        assert_eq!(children, vec![Id::new("z"), Id::new("a"), Id::new("m")]);
        assert_eq!(graph.child_count(p), 3);
        assert!(graph.has_children(p));
        assert!(!graph.has_children(Id::new("z")));
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = graph_with(&["a", "b"]);
        let (a, b) = (Id::new("a"), Id::new("b"));
        let idx = graph.add_edge(a, b, EdgeKind::Child).unwrap();

        assert_eq!(graph.remove_edge(idx), Some((a, b, EdgeKind::Child)));
        assert_eq!(graph.remove_edge(idx), None);
        assert_eq!(graph.parent(b), None);
        assert_eq!(graph.edges_count(), 0);
    }

    #[test]
    fn test_remove_node_detaches_edges() {
        let mut graph = graph_with(&["a", "b", "c"]);
        let (a, b, c) = (Id::new("a"), Id::new("b"), Id::new("c"));
        graph.add_edge(a, b, EdgeKind::Child).unwrap();
        graph.add_edge(b, c, EdgeKind::Child).unwrap();

        assert!(graph.remove_node(b).is_some());

        assert!(!graph.contains(b));
        assert_eq!(graph.child_count(a), 0);
        assert_eq!(graph.parent(c), None);
        assert_eq!(graph.roots().collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(graph.edges_count(), 0);
        assert!(graph.remove_node(b).is_none());
    }

    #[test]
    fn test_removed_edge_slots_are_reused() {
        let mut graph = graph_with(&["a", "b", "c"]);
        let (a, b, c) = (Id::new("a"), Id::new("b"), Id::new("c"));

        for _ in 0..100 {
            let idx = graph.add_edge(a, b, EdgeKind::Connection).unwrap();
            graph.remove_edge(idx);
        }
        let first = graph.add_edge(a, b, EdgeKind::Child).unwrap();
        let second = graph.add_edge(a, c, EdgeKind::Child).unwrap();

        assert_eq!(graph.edges.len(), 2);
        assert_ne!(first, second);
        assert_eq!(graph.children(a).collect::<Vec<_>>(), vec![b, c]);

        // A stale index no longer removes anything once its slot is free.
        assert!(graph.remove_edge(first).is_some());
        assert!(graph.remove_edge(first).is_none());
        assert_eq!(graph.children(a).collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    fn test_clear() {
        let mut graph = graph_with(&["a", "b"]);
        graph
            .add_edge(Id::new("a"), Id::new("b"), EdgeKind::Child)
            .unwrap();

        graph.clear();

        assert_eq!(graph.nodes_count(), 0);
        assert_eq!(graph.edges().count(), 0);
    }

    #[test]
    fn test_update_definition() {
        let mut graph = graph_with(&["a"]);

        let old = graph
            .update_definition(Id::new("a"), Definition::new("Gateway"))
            .unwrap();

        assert_eq!(old.id(), "Task");
        assert_eq!(graph.node(Id::new("a")).unwrap().id(), "Gateway");
        assert_eq!(
            graph.update_definition(Id::new("x"), Definition::new("Task")),
            Err(GraphError::UnknownNode(Id::new("x")))
        );
    }

    proptest! {
        #[test]
        fn every_node_is_a_root_or_has_one_parent(parents in prop::collection::vec(any::<prop::sample::Index>(), 1..40)) {
            let mut graph = Graph::new();
            let ids: Vec<Id> = (0..parents.len()).map(|i| Id::new(&format!("prop-{i}"))).collect();
            for (i, id) in ids.iter().enumerate() {
                graph.add_node(*id, task(&i.to_string()));
                if i > 0 {
                    let parent = ids[parents[i].index(i)];
                    graph.add_edge(parent, *id, EdgeKind::Child).unwrap();
                }
            }

            prop_assert_eq!(graph.roots().collect::<Vec<_>>(), vec![ids[0]]);
            let child_total: usize = ids.iter().map(|id| graph.child_count(*id)).sum();
            prop_assert_eq!(child_total, ids.len() - 1);
        }
    }
}
