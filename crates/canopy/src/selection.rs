//! Selection bridge between tree items and canvas shapes.
//!
//! The canvas owns selection. A click on a tree item does not select
//! anything by itself: it produces an [`CanvasEvent::ElementSelected`]
//! notification for the host to broadcast, and the tree follows once that
//! notification comes back through the external path.

use log::debug;

use canopy_core::identifier::Id;

use crate::{
    canvas::{Canvas, CanvasEvent, ScopedEvent},
    tree::TreeView,
};

/// Holds the id currently highlighted in both tree and canvas.
#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    selected: Option<Id>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected id.
    pub fn selected(&self) -> Option<Id> {
        self.selected
    }

    /// Applies a canvas-origin selection to the tree.
    ///
    /// Returns `false` without touching the view if `id` is already the
    /// selection and the view still highlights it.
    pub fn canvas_selected<V: TreeView>(&mut self, view: &mut V, id: Id) -> bool {
        if self.selected == Some(id) && view.selected_item() == Some(id) {
            debug!(id:%; "Element already selected");
            return false;
        }

        self.selected = Some(id);
        view.set_selected_item(id);
        debug!(id:%; "Selected tree item");
        true
    }

    /// Re-applies the highlight after the tree changed.
    ///
    /// Re-inserting an item drops its highlight in the view. If the selected
    /// item is no longer in the tree the selection is forgotten instead.
    pub fn restore<V: TreeView>(&mut self, view: &mut V) {
        let Some(id) = self.selected else {
            return;
        };
        if view.selected_item() == Some(id) {
            return;
        }

        if view.item(id).is_some() {
            view.set_selected_item(id);
            debug!(id:%; "Restored tree selection");
        } else {
            self.selected = None;
            debug!(id:%; "Selected item left the tree; selection dropped");
        }
    }

    /// Translates a click on a tree item into a selection notification.
    ///
    /// Returns `None` when the canvas has no drawable shape for `id`.
    pub fn item_clicked<C: Canvas>(&self, canvas: &C, id: Id) -> Option<ScopedEvent> {
        if !canvas.has_shape(id) {
            debug!(id:%; "Tree item has no canvas shape; selection suppressed");
            return None;
        }
        Some(ScopedEvent::new(
            canvas.context_id(),
            CanvasEvent::ElementSelected(id),
        ))
    }

    /// Forgets the current selection.
    pub fn reset(&mut self) {
        self.selected = None;
    }
}
