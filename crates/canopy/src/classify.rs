//! Leaf/container classification and display labels.

use canopy_core::{definition::Definition, graph::ContainmentGraph, identifier::Id};

use crate::tree::ItemKind;

/// Result of classifying a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: ItemKind,
    pub label: String,
}

/// Classifies a node as it currently stands in the graph.
///
/// A node with at least one containment child is a container, otherwise a
/// leaf. Returns `None` if the node is not in the graph.
pub fn classify<G: ContainmentGraph>(
    graph: &G,
    id: Id,
    placeholder: &str,
) -> Option<Classification> {
    let definition = graph.definition(id)?;
    let kind = if graph.has_children(id) {
        ItemKind::Container
    } else {
        ItemKind::Leaf
    };

    Some(Classification {
        kind,
        label: item_label(definition, placeholder),
    })
}

/// Picks the display label of a definition.
///
/// Precedence: a non-blank `name`, then the `title`, then `placeholder`.
pub fn item_label(definition: &Definition, placeholder: &str) -> String {
    if let Some(name) = definition.name().filter(|name| !name.trim().is_empty()) {
        return name.to_string();
    }
    definition.title().unwrap_or(placeholder).to_string()
}
