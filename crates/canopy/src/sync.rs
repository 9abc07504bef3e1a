//! Graph → tree synchronization.
//!
//! [`TreeSyncController`] owns the rendering surface and keeps it consistent
//! with the graph. A full rebuild walks the whole containment structure;
//! after that, single-node events are applied incrementally:
//!
//! - **add**: classify the node and insert it under its parent item. If the
//!   parent just gained its first child and is still shown as a leaf, the
//!   parent item is re-inserted as a container first (promotion).
//! - **update**: a diff guard compares the node's label and child count with
//!   the tree. When something changed the item is re-inserted and, if the
//!   node has children, its subtree is walked and re-inserted by id.
//! - **remove**: drops the single item. Descendants are expected to arrive
//!   as their own removal events.
//! - **clear**: empties the surface.
//!
//! Promotion is one-way: a container that loses all of its children stays a
//! container until it is re-inserted for another reason.
//!
//! None of these operations fail. A change that cannot be applied (missing
//! parent item, node no longer in the graph) is skipped and reported through
//! `log`.
//!
//! Every operation takes `&mut self`, so the controller cannot be re-entered
//! while the synthesized remove/re-insert sequences are in flight.

use log::{debug, info, trace, warn};

use canopy_core::{definition::Definition, graph::ContainmentGraph, identifier::Id};

use crate::{
    classify::{classify, item_label},
    config::ExplorerConfig,
    error::SyncError,
    glyph::{DefinitionGlyphs, Glyph, GlyphResolver},
    traverse::{Visit, traverse},
    tree::{ItemKind, Projection, TreeView},
};

/// Everything needed to write one item, computed before the tree is touched.
#[derive(Debug)]
struct Placement {
    id: Id,
    parent: Option<Id>,
    label: String,
    icon: Glyph,
    kind: ItemKind,
}

/// Keeps a [`TreeView`] in sync with a [`ContainmentGraph`].
#[derive(Debug)]
pub struct TreeSyncController<V = Projection, R = DefinitionGlyphs> {
    view: V,
    glyphs: R,
    config: ExplorerConfig,
}

impl Default for TreeSyncController {
    fn default() -> Self {
        Self::new(Projection::new(), DefinitionGlyphs, ExplorerConfig::default())
    }
}

impl<V, R> TreeSyncController<V, R>
where
    V: TreeView,
    R: GlyphResolver,
{
    /// Creates a controller driving `view`.
    ///
    /// # Arguments
    ///
    /// * `view` - Rendering surface the projection is written to.
    /// * `glyphs` - Resolver for item icons.
    /// * `config` - Icon size, initial expand state and placeholder label.
    pub fn new(view: V, glyphs: R, config: ExplorerConfig) -> Self {
        Self {
            view,
            glyphs,
            config,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Discards the projection and re-creates it from a full traversal.
    ///
    /// Items are inserted in traversal pre-order, so every parent item exists
    /// before its children are inserted.
    pub fn rebuild<G: ContainmentGraph>(&mut self, graph: &G) {
        self.view.clear();

        let mut inserted = 0usize;
        for visit in traverse(graph, None) {
            if self.apply_visit(graph, &visit) {
                inserted += 1;
            }
        }

        info!(items = inserted; "Rebuilt tree from graph");
    }

    /// Inserts the item for a node added to the graph.
    ///
    /// `parent` is the node's containment parent, or `None` for a root.
    pub fn node_added<G: ContainmentGraph>(&mut self, graph: &G, parent: Option<Id>, id: Id) {
        debug!(id:%, parent:? = parent.map(|p| p.to_string()); "Node added");
        if let Err(err) = self.insert_item(graph, parent, id) {
            warn!(id:%, err:%; "Skipping tree insertion");
        }
    }

    /// Re-inserts the item of an updated node when its label or child count
    /// changed; otherwise does nothing.
    pub fn node_updated<G: ContainmentGraph>(&mut self, graph: &G, id: Id) {
        if self.view.item(id).is_none() {
            debug!(id:%; "Updated node has no tree item; ignoring");
            return;
        }

        let child_count = graph.child_count(id);
        let placement = match self.place(graph, graph.parent(id), id) {
            Ok(placement) => placement,
            Err(err) => {
                warn!(id:%, err:%; "Skipping tree update");
                return;
            }
        };

        if !self.view.has_changed(id, &placement.label, child_count) {
            debug!(id:%; "Tree item unchanged");
            return;
        }

        debug!(id:%, label = placement.label.as_str(), children = child_count; "Refreshing tree item");
        self.view.remove_item(id);
        self.commit(graph, &placement);

        if child_count > 0 {
            let mut reinserted = 0usize;
            for visit in traverse(graph, Some(id)) {
                // The subtree root was just committed above.
                if matches!(visit, Visit::Nested { .. }) && self.apply_visit(graph, &visit) {
                    reinserted += 1;
                }
            }
            debug!(id:%, descendants = reinserted; "Re-inserted subtree");
        }
    }

    /// Removes the item of a removed node. Child items are left in place.
    pub fn node_removed(&mut self, id: Id) {
        if self.view.item(id).is_none() {
            debug!(id:%; "Removed node has no tree item");
            return;
        }

        let orphaned = self.view.child_count(id);
        self.view.remove_item(id);

        if orphaned > 0 {
            debug!(id:%, children = orphaned; "Removed item still has child items; awaiting their removal");
        } else {
            debug!(id:%; "Removed tree item");
        }
    }

    /// Empties the projection without rebuilding it.
    pub fn cleared(&mut self) {
        self.view.clear();
        debug!("Cleared tree");
    }

    /// Applies one traversal step. Returns `true` if an item was written.
    fn apply_visit<G: ContainmentGraph>(&mut self, graph: &G, visit: &Visit) -> bool {
        let result = match visit {
            Visit::Root { node } => self.insert_item(graph, None, *node),
            Visit::Nested { ancestors, node } => {
                self.insert_item(graph, ancestors.first().copied(), *node)
            }
        };

        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(node:% = visit.node(), err:%; "Skipping traversal step");
                false
            }
        }
    }

    fn insert_item<G: ContainmentGraph>(
        &mut self,
        graph: &G,
        parent: Option<Id>,
        id: Id,
    ) -> Result<(), SyncError> {
        let placement = self.place(graph, parent, id)?;
        self.commit(graph, &placement);
        Ok(())
    }

    /// Classifies a node and checks that it can be placed under `parent`.
    fn place<G: ContainmentGraph>(
        &self,
        graph: &G,
        parent: Option<Id>,
        id: Id,
    ) -> Result<Placement, SyncError> {
        let definition = graph.definition(id).ok_or(SyncError::UnknownNode(id))?;

        if let Some(parent) = parent {
            if self.view.item(parent).is_none() {
                return Err(SyncError::MissingParentItem { parent, child: id });
            }
        }

        let classification = classify(graph, id, self.config.placeholder_label())
            .ok_or(SyncError::UnknownNode(id))?;

        Ok(Placement {
            id,
            parent,
            label: classification.label,
            icon: self.icon(definition),
            kind: classification.kind,
        })
    }

    /// Writes a placement, promoting its parent first if needed.
    fn commit<G: ContainmentGraph>(&mut self, graph: &G, placement: &Placement) {
        if let Some(parent) = placement.parent {
            self.promote_if_first_child(graph, parent);
        }
        self.write(placement, self.config.expand_items());
    }

    /// Re-inserts `parent` as a container when it has exactly one child in
    /// the graph and is still shown as a leaf. Its expand state is kept.
    fn promote_if_first_child<G: ContainmentGraph>(&mut self, graph: &G, parent: Id) {
        if graph.child_count(parent) != 1 {
            return;
        }
        let Some(item) = self.view.item(parent) else {
            return;
        };
        if item.kind() == ItemKind::Container {
            return;
        }

        let grandparent = item.parent();
        let expanded = item.is_expanded();
        if let Some(grandparent) = grandparent {
            if self.view.item(grandparent).is_none() {
                warn!(id:% = parent, parent:% = grandparent; "Cannot promote item whose parent item is missing");
                return;
            }
        }
        let Some(definition) = graph.definition(parent) else {
            return;
        };

        let placement = Placement {
            id: parent,
            parent: grandparent,
            label: item_label(definition, self.config.placeholder_label()),
            icon: self.icon(definition),
            kind: ItemKind::Container,
        };
        self.view.remove_item(parent);
        self.write(&placement, expanded);

        debug!(id:% = parent; "Promoted tree item to container");
    }

    fn write(&mut self, placement: &Placement, expanded: bool) {
        trace!(id:% = placement.id, kind:? = placement.kind; "Writing tree item");
        match placement.parent {
            Some(parent) => self.view.add_child_item(
                placement.id,
                parent,
                &placement.label,
                placement.icon,
                placement.kind,
                expanded,
            ),
            None => self.view.add_item(
                placement.id,
                &placement.label,
                placement.icon,
                placement.kind,
                expanded,
            ),
        }
    }

    fn icon(&self, definition: &Definition) -> Glyph {
        let size = self.config.icon();
        self.glyphs
            .glyph(definition.id(), size.width(), size.height())
    }
}
