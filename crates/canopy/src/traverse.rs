//! Depth-first containment traversal.
//!
//! The traversal follows only containment edges and yields nodes in
//! pre-order, so a parent is always visited before any of its children.
//! Siblings are visited in the source order of their parent's outgoing
//! containment edges, and roots in the graph's root order. The walk is a
//! pure producer: it borrows the graph and never touches the tree.
//!
//! Each node is reported once as a [`Visit`]. Top-level nodes (and the
//! subtree root of a bounded traversal) arrive as [`Visit::Root`]; every
//! other node arrives as [`Visit::Nested`] together with its ancestor chain.

use std::collections::HashSet;

use log::{debug, warn};

use canopy_core::{graph::ContainmentGraph, identifier::Id};

/// A single step of a containment traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// A node visited without ancestors.
    Root { node: Id },
    /// A node visited below the traversal root.
    ///
    /// `ancestors[0]` is the immediate parent; the last element is the
    /// node the traversal descended from.
    Nested { ancestors: Vec<Id>, node: Id },
}

impl Visit {
    /// The visited node.
    pub fn node(&self) -> Id {
        match self {
            Self::Root { node } | Self::Nested { node, .. } => *node,
        }
    }

    /// The immediate parent, or `None` for a root visit.
    pub fn parent(&self) -> Option<Id> {
        match self {
            Self::Root { .. } => None,
            Self::Nested { ancestors, .. } => ancestors.first().copied(),
        }
    }

    /// Ancestor chain, nearest first. Empty for a root visit.
    pub fn ancestors(&self) -> &[Id] {
        match self {
            Self::Root { .. } => &[],
            Self::Nested { ancestors, .. } => ancestors,
        }
    }

    /// Distance from the traversal root.
    pub fn depth(&self) -> usize {
        self.ancestors().len()
    }
}

/// Pending node on the traversal stack.
#[derive(Debug)]
struct Frame {
    node: Id,
    ancestors: Vec<Id>,
}

/// Iterator over a containment traversal. Created by [`traverse`].
#[derive(Debug)]
pub struct Traversal<'g, G> {
    graph: &'g G,
    stack: Vec<Frame>,
    visited: HashSet<Id>,
}

/// Walks the containment structure of `graph` depth-first.
///
/// Without `root_id` every root of the graph is walked in order. With
/// `root_id` the walk is restricted to the subtree of that node, which is
/// itself reported as a [`Visit::Root`]. An unknown `root_id` yields
/// nothing.
///
/// # Examples
///
/// ```
/// use canopy::traverse::{Visit, traverse};
/// use canopy_core::{
///     definition::Definition,
///     graph::{EdgeKind, Graph},
///     identifier::Id,
/// };
///
/// let mut graph = Graph::new();
/// let (lane, task) = (Id::new("lane"), Id::new("task"));
/// graph.add_node(lane, Definition::new("Lane"));
/// graph.add_node(task, Definition::new("Task"));
/// graph.add_edge(lane, task, EdgeKind::Child).unwrap();
///
/// let visits: Vec<Visit> = traverse(&graph, None).collect();
/// assert_eq!(
///     visits,
///     vec![
///         Visit::Root { node: lane },
///         Visit::Nested { ancestors: vec![lane], node: task },
///     ]
/// );
/// ```
pub fn traverse<G: ContainmentGraph>(graph: &G, root_id: Option<Id>) -> Traversal<'_, G> {
    let stack = match root_id {
        Some(id) if graph.contains(id) => vec![Frame {
            node: id,
            ancestors: Vec::new(),
        }],
        Some(id) => {
            debug!(root:% = id; "Traversal root is not in the graph");
            Vec::new()
        }
        None => {
            let roots: Vec<Id> = graph.roots().collect();
            roots
                .into_iter()
                .rev()
                .map(|node| Frame {
                    node,
                    ancestors: Vec::new(),
                })
                .collect()
        }
    };

    Traversal {
        graph,
        stack,
        visited: HashSet::new(),
    }
}

impl<G: ContainmentGraph> Iterator for Traversal<'_, G> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        loop {
            let Frame { node, ancestors } = self.stack.pop()?;

            if !self.visited.insert(node) {
                warn!(node:%; "Containment cycle detected; node already visited");
                continue;
            }

            let children: Vec<Id> = self.graph.children(node).collect();
            for child in children.into_iter().rev() {
                let mut chain = Vec::with_capacity(ancestors.len() + 1);
                chain.push(node);
                chain.extend_from_slice(&ancestors);
                self.stack.push(Frame {
                    node: child,
                    ancestors: chain,
                });
            }

            return Some(if ancestors.is_empty() {
                Visit::Root { node }
            } else {
                Visit::Nested { ancestors, node }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use canopy_core::{
        definition::Definition,
        graph::{EdgeKind, Graph},
    };

    use super::*;

    /// Builds a graph from `(parent, child)` containment pairs.
    fn build(nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::new();
        for node in nodes {
            graph.add_node(Id::new(node), Definition::new("Task"));
        }
        for (parent, child) in edges {
            graph
                .add_edge(Id::new(parent), Id::new(child), EdgeKind::Child)
                .unwrap();
        }
        graph
    }

    fn nodes(visits: &[Visit]) -> Vec<String> {
        visits.iter().map(|v| v.node().to_string()).collect()
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new();
        assert_eq!(traverse(&graph, None).count(), 0);
    }

    #[test]
    fn test_pre_order_in_edge_order() {
        //     r1         r2
        //   /    \
        //  a      b
        //  |
        //  c
        let graph = build(
            &["r1", "a", "b", "c", "r2"],
            &[("r1", "a"), ("r1", "b"), ("a", "c")],
        );

        let visits: Vec<Visit> = traverse(&graph, None).collect();

        assert_eq!(nodes(&visits), vec!["r1", "a", "c", "b", "r2"]);
        assert_eq!(visits[0], Visit::Root { node: Id::new("r1") });
        assert_eq!(
            visits[2],
            Visit::Nested {
                ancestors: vec![Id::new("a"), Id::new("r1")],
                node: Id::new("c"),
            }
        );
        assert_eq!(visits[3].parent(), Some(Id::new("r1")));
        assert_eq!(visits[4], Visit::Root { node: Id::new("r2") });
    }

    #[test]
    fn test_parents_precede_children() {
        let graph = build(
            &["p", "x", "y", "z"],
            &[("p", "x"), ("x", "y"), ("p", "z")],
        );

        let mut seen = HashSet::new();
        for visit in traverse(&graph, None) {
            if let Some(parent) = visit.parent() {
                assert!(seen.contains(&parent), "{} visited before parent", visit.node());
            }
            seen.insert(visit.node());
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_non_containment_edges_are_ignored() {
        let mut graph = build(&["a", "b"], &[]);
        graph
            .add_edge(Id::new("a"), Id::new("b"), EdgeKind::Connection)
            .unwrap();

        let visits: Vec<Visit> = traverse(&graph, None).collect();
        assert!(visits.iter().all(|v| matches!(v, Visit::Root { .. })));
        assert_eq!(nodes(&visits), vec!["a", "b"]);
    }

    #[test]
    fn test_subtree_traversal_starts_at_root_id() {
        let graph = build(
            &["top", "mid", "leaf", "other"],
            &[("top", "mid"), ("mid", "leaf"), ("top", "other")],
        );

        let visits: Vec<Visit> = traverse(&graph, Some(Id::new("mid"))).collect();

        assert_eq!(
            visits,
            vec![
                Visit::Root { node: Id::new("mid") },
                Visit::Nested {
                    ancestors: vec![Id::new("mid")],
                    node: Id::new("leaf"),
                },
            ]
        );
    }

    #[test]
    fn test_unknown_root_id_yields_nothing() {
        let graph = build(&["a"], &[]);
        assert_eq!(traverse(&graph, Some(Id::new("ghost"))).count(), 0);
    }

    #[test]
    fn test_traversal_is_deterministic() {
        let graph = build(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("a", "c"), ("c", "d"), ("b", "e")],
        );

        let first: Vec<Visit> = traverse(&graph, None).collect();
        let second: Vec<Visit> = traverse(&graph, None).collect();
        assert_eq!(first, second);
    }

    /// Graph whose containment loops back on itself; only reachable with an
    /// explicit root.
    struct LoopGraph;

    impl ContainmentGraph for LoopGraph {
        fn contains(&self, id: Id) -> bool {
            id == "x" || id == "y"
        }

        fn definition(&self, _id: Id) -> Option<&Definition> {
            None
        }

        fn children(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
            let next = if id == "x" { Id::new("y") } else { Id::new("x") };
            std::iter::once(next)
        }

        fn parent(&self, id: Id) -> Option<Id> {
            self.children(id).next()
        }

        fn roots(&self) -> impl Iterator<Item = Id> + '_ {
            std::iter::empty()
        }
    }

    #[test]
    fn test_cycle_is_visited_once() {
        let visits: Vec<Visit> = traverse(&LoopGraph, Some(Id::new("x"))).collect();
        assert_eq!(nodes(&visits), vec!["x", "y"]);
        assert_eq!(traverse(&LoopGraph, None).count(), 0);
    }

    #[test]
    fn test_visit_accessors() {
        let root = Visit::Root { node: Id::new("r") };
        assert_eq!(root.parent(), None);
        assert_eq!(root.depth(), 0);
        assert!(root.ancestors().is_empty());

        let nested = Visit::Nested {
            ancestors: vec![Id::new("p"), Id::new("r")],
            node: Id::new("n"),
        };
        assert_eq!(nested.node(), Id::new("n"));
        assert_eq!(nested.parent(), Some(Id::new("p")));
        assert_eq!(nested.depth(), 2);
    }
}
