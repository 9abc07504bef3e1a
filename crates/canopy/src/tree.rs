//! Tree items and the rendering surface they are projected onto.
//!
//! [`TreeView`] is the contract between the sync controller and whatever
//! renders the explorer. [`Projection`] is the in-memory implementation: an
//! id-indexed set of [`TreeItem`]s with parent links, a visual selection and
//! an outline walk for display.

use std::{collections::HashMap, fmt};

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace, warn};

use canopy_core::identifier::Id;

use crate::glyph::Glyph;

/// Classification of a tree item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Leaf,
    Container,
}

/// One row of the explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    id: Id,
    parent: Option<Id>,
    label: String,
    icon: Glyph,
    kind: ItemKind,
    expanded: bool,
}

impl TreeItem {
    pub fn new(
        id: Id,
        parent: Option<Id>,
        label: impl Into<String>,
        icon: Glyph,
        kind: ItemKind,
        expanded: bool,
    ) -> Self {
        Self {
            id,
            parent,
            label: label.into(),
            icon,
            kind,
            expanded,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn icon(&self) -> Glyph {
        self.icon
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn is_container(&self) -> bool {
        self.kind == ItemKind::Container
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

/// Rendering surface driven by the sync controller.
///
/// Inserting an id that is already present replaces that item; it never
/// produces a duplicate. Removal affects only the named item.
pub trait TreeView {
    /// Inserts a root-level item.
    fn add_item(&mut self, id: Id, label: &str, icon: Glyph, kind: ItemKind, expanded: bool);

    /// Inserts an item under an existing parent item.
    fn add_child_item(
        &mut self,
        id: Id,
        parent: Id,
        label: &str,
        icon: Glyph,
        kind: ItemKind,
        expanded: bool,
    );

    /// Removes a single item.
    fn remove_item(&mut self, id: Id);

    /// Highlights an item.
    fn set_selected_item(&mut self, id: Id);

    /// The highlighted item. Removing or clearing it drops the highlight.
    fn selected_item(&self) -> Option<Id>;

    /// Removes every item.
    fn clear(&mut self);

    /// Looks up an item.
    fn item(&self, id: Id) -> Option<&TreeItem>;

    /// Number of items currently placed under `id`.
    fn child_count(&self, id: Id) -> usize;

    /// Returns `true` if the item exists and its label or number of child
    /// items differs from the given values.
    ///
    /// An unknown id reports no change: there is nothing to diff against.
    fn has_changed(&self, id: Id, label: &str, child_count: usize) -> bool {
        self.item(id)
            .is_some_and(|item| item.label() != label || self.child_count(id) != child_count)
    }
}

/// In-memory tree projection.
#[derive(Debug, Default)]
pub struct Projection {
    items: IndexMap<Id, TreeItem>,
    /// Child item ids per parent id, in insertion order.
    children: HashMap<Id, IndexSet<Id>>,
    selected: Option<Id>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks if an item with the given ID exists.
    pub fn contains(&self, id: Id) -> bool {
        self.items.contains_key(&id)
    }

    /// Returns an iterator over all items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &TreeItem> {
        self.items.values()
    }

    /// Returns an iterator over the root-level items.
    pub fn root_items(&self) -> impl Iterator<Item = &TreeItem> {
        self.items.values().filter(|item| item.parent.is_none())
    }

    /// Returns the child items of `id`, in insertion order.
    pub fn child_items(&self, id: Id) -> impl Iterator<Item = &TreeItem> {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|child| self.items.get(child))
    }

    /// Items whose parent item is no longer present.
    pub fn dangling_items(&self) -> impl Iterator<Item = &TreeItem> {
        self.items.values().filter(|item| {
            item.parent
                .is_some_and(|parent| !self.items.contains_key(&parent))
        })
    }

    /// The visually selected item, if any.
    pub fn selected(&self) -> Option<Id> {
        self.selected
    }

    /// Sets the expand state of an item. Returns `false` if it does not exist.
    pub fn set_expanded(&mut self, id: Id, expanded: bool) -> bool {
        match self.items.get_mut(&id) {
            Some(item) => {
                item.expanded = expanded;
                true
            }
            None => false,
        }
    }

    /// Walks the items reachable from the root items in display order.
    ///
    /// Each entry carries the item's depth below its root item. Items whose
    /// parent is missing are not reachable and are not part of the outline.
    pub fn outline(&self) -> Vec<(usize, &TreeItem)> {
        let mut outline = Vec::with_capacity(self.items.len());
        let mut stack: Vec<(usize, &TreeItem)> =
            self.root_items().map(|item| (0, item)).collect();
        stack.reverse();

        while let Some((depth, item)) = stack.pop() {
            outline.push((depth, item));
            let children: Vec<&TreeItem> = self.child_items(item.id).collect();
            for child in children.into_iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        outline
    }

    fn insert(&mut self, item: TreeItem) {
        let id = item.id;
        let new_parent = item.parent;
        trace!(id:%, parent:? = new_parent.map(|p| p.to_string()); "Inserting tree item");

        if let Some(previous) = self.items.insert(id, item) {
            if previous.parent != new_parent {
                self.detach(id, previous.parent);
            }
        }
        if let Some(parent) = new_parent {
            self.children.entry(parent).or_default().insert(id);
        }
    }

    fn detach(&mut self, id: Id, parent: Option<Id>) {
        let Some(parent) = parent else {
            return;
        };
        if let Some(siblings) = self.children.get_mut(&parent) {
            siblings.shift_remove(&id);
            if siblings.is_empty() {
                self.children.remove(&parent);
            }
        }
    }
}

impl TreeView for Projection {
    fn add_item(&mut self, id: Id, label: &str, icon: Glyph, kind: ItemKind, expanded: bool) {
        self.insert(TreeItem::new(id, None, label, icon, kind, expanded));
    }

    fn add_child_item(
        &mut self,
        id: Id,
        parent: Id,
        label: &str,
        icon: Glyph,
        kind: ItemKind,
        expanded: bool,
    ) {
        if !self.items.contains_key(&parent) {
            warn!(id:%, parent:%; "Parent item is missing; item not inserted");
            return;
        }
        self.insert(TreeItem::new(id, Some(parent), label, icon, kind, expanded));
    }

    fn remove_item(&mut self, id: Id) {
        let Some(item) = self.items.shift_remove(&id) else {
            debug!(id:%; "Tree item to remove does not exist");
            return;
        };
        self.detach(id, item.parent);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    fn set_selected_item(&mut self, id: Id) {
        if self.items.contains_key(&id) {
            self.selected = Some(id);
        } else {
            debug!(id:%; "Cannot select missing tree item");
        }
    }

    fn selected_item(&self) -> Option<Id> {
        self.selected
    }

    fn clear(&mut self) {
        self.items.clear();
        self.children.clear();
        self.selected = None;
    }

    fn item(&self, id: Id) -> Option<&TreeItem> {
        self.items.get(&id)
    }

    fn child_count(&self, id: Id) -> usize {
        self.children.get(&id).map_or(0, IndexSet::len)
    }
}

impl fmt::Display for Projection {
    /// Renders the expanded part of the outline, one item per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hidden_below: Option<usize> = None;
        for (depth, item) in self.outline() {
            if let Some(limit) = hidden_below {
                if depth > limit {
                    continue;
                }
                hidden_below = None;
            }

            let marker = match (item.kind, item.expanded) {
                (ItemKind::Leaf, _) => '-',
                (ItemKind::Container, true) => 'v',
                (ItemKind::Container, false) => '>',
            };
            let selected = if self.selected == Some(item.id) { " *" } else { "" };
            writeln!(
                f,
                "{:indent$}{marker} {} [{}]{selected}",
                "",
                item.label,
                item.icon.definition(),
                indent = depth * 2
            )?;

            if item.kind == ItemKind::Container && !item.expanded {
                hidden_below = Some(depth);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon() -> Glyph {
        Glyph::new(Id::new("Task"), 13, 13)
    }

    fn id(name: &str) -> Id {
        Id::new(name)
    }

    /// root
    /// ├── a
    /// │   └── c
    /// └── b
    fn sample() -> Projection {
        let mut tree = Projection::new();
        tree.add_item(id("root"), "Root", icon(), ItemKind::Container, true);
        tree.add_child_item(id("a"), id("root"), "A", icon(), ItemKind::Container, true);
        tree.add_child_item(id("b"), id("root"), "B", icon(), ItemKind::Leaf, true);
        tree.add_child_item(id("c"), id("a"), "C", icon(), ItemKind::Leaf, true);
        tree
    }

    #[test]
    fn test_add_items() {
        let tree = sample();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.item(id("c")).unwrap().parent(), Some(id("a")));
        assert_eq!(tree.child_count(id("root")), 2);
        assert_eq!(tree.root_items().count(), 1);
    }

    #[test]
    fn test_add_child_with_missing_parent_is_skipped() {
        let mut tree = Projection::new();
        tree.add_child_item(id("orphan"), id("nowhere"), "O", icon(), ItemKind::Leaf, true);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut tree = sample();

        tree.add_child_item(id("a"), id("root"), "A2", icon(), ItemKind::Container, false);

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.child_count(id("root")), 2);
        let labels: Vec<&str> = tree.child_items(id("root")).map(TreeItem::label).collect();
        assert_eq!(labels, vec!["A2", "B"]);
        assert!(!tree.item(id("a")).unwrap().is_expanded());
    }

    #[test]
    fn test_reinsert_under_new_parent_moves_item() {
        let mut tree = sample();

        tree.add_child_item(id("c"), id("b"), "C", icon(), ItemKind::Leaf, true);

        assert_eq!(tree.child_count(id("a")), 0);
        assert_eq!(tree.child_count(id("b")), 1);
        assert_eq!(tree.item(id("c")).unwrap().parent(), Some(id("b")));
    }

    #[test]
    fn test_remove_does_not_cascade() {
        let mut tree = sample();

        tree.remove_item(id("a"));

        assert!(!tree.contains(id("a")));
        assert!(tree.contains(id("c")));
        assert_eq!(tree.child_count(id("root")), 1);
        let dangling: Vec<Id> = tree.dangling_items().map(TreeItem::id).collect();
        assert_eq!(dangling, vec![id("c")]);
    }

    #[test]
    fn test_dangling_children_reattach_when_parent_returns() {
        let mut tree = sample();

        tree.remove_item(id("a"));
        tree.add_child_item(id("a"), id("root"), "A", icon(), ItemKind::Container, true);

        assert_eq!(tree.child_count(id("a")), 1);
        assert_eq!(tree.dangling_items().count(), 0);
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let mut tree = sample();
        tree.remove_item(id("ghost"));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_has_changed() {
        let tree = sample();

        assert!(!tree.has_changed(id("a"), "A", 1));
        assert!(tree.has_changed(id("a"), "Renamed", 1));
        assert!(tree.has_changed(id("a"), "A", 2));
        assert!(!tree.has_changed(id("ghost"), "anything", 7));
    }

    #[test]
    fn test_selection() {
        let mut tree = sample();

        tree.set_selected_item(id("b"));
        assert_eq!(tree.selected(), Some(id("b")));

        tree.set_selected_item(id("ghost"));
        assert_eq!(tree.selected(), Some(id("b")));

        tree.remove_item(id("b"));
        assert_eq!(tree.selected(), None);
    }

    #[test]
    fn test_clear() {
        let mut tree = sample();
        tree.set_selected_item(id("a"));

        tree.clear();

        assert!(tree.is_empty());
        assert_eq!(tree.child_count(id("root")), 0);
        assert_eq!(tree.selected(), None);
    }

    #[test]
    fn test_outline_order_and_depth() {
        let tree = sample();

        let outline: Vec<(usize, String)> = tree
            .outline()
            .into_iter()
            .map(|(depth, item)| (depth, item.id().to_string()))
            .collect();

        assert_eq!(
            outline,
            vec![
                (0, "root".to_string()),
                (1, "a".to_string()),
                (2, "c".to_string()),
                (1, "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_display_hides_collapsed_children() {
        let mut tree = sample();
        tree.set_selected_item(id("b"));
        tree.set_expanded(id("a"), false);

        let rendered = tree.to_string();

        assert_eq!(rendered, "v Root [Task]\n  > A [Task]\n  - B [Task] *\n");
    }
}
