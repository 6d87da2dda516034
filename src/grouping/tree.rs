//! The grouping tree: one root theme, nested themes, and the list of ungrouped leaves.

use super::layout::{LayoutMetrics, LayoutSummary};
use super::node::{LayoutNode, NodeId};
use super::reparent::GrabState;
use crate::types::{LayoutObject, ObjectId};
use log::{debug, warn};
use std::collections::HashMap;

/// A position inside one of the tree's containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Child `index` of the group `parent`
    Group {
        /// The containing group
        parent: NodeId,
        /// Index among the group's children
        index: usize,
    },
    /// Entry `index` of the free list
    Free {
        /// Index in the free list
        index: usize,
    },
}

/// Owns every grouping node and keeps the object-to-leaf mapping.
///
/// All operations are total: unknown objects, stale node ids and detached nodes resolve to
/// no-ops. Every structural change re-runs the layout pass before returning, so spans are
/// always current when the UI hit-tests against them.
#[derive(Debug, Clone)]
pub struct GroupingTree {
    pub(super) nodes: HashMap<NodeId, LayoutNode>,
    pub(super) root: NodeId,
    pub(super) free_nodes: Vec<NodeId>,
    pub(super) object_index: HashMap<ObjectId, NodeId>,
    pub(super) selected: Option<NodeId>,
    pub(super) grabbed: Option<GrabState>,
    pub(super) metrics: LayoutMetrics,
    pub(super) summary: LayoutSummary,
}

impl Default for GroupingTree {
    fn default() -> Self {
        Self::new(LayoutMetrics::default())
    }
}

impl GroupingTree {
    /// Creates a tree holding only an empty root.
    pub fn new(metrics: LayoutMetrics) -> Self {
        let root = LayoutNode::new_group();
        let root_id = root.id;
        let mut tree = Self {
            nodes: HashMap::from([(root_id, root)]),
            root: root_id,
            free_nodes: Vec::new(),
            object_index: HashMap::new(),
            selected: None,
            grabbed: None,
            metrics,
            summary: LayoutSummary::default(),
        };
        tree.recompute_layout();
        tree
    }

    /// The root group.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Looks up a node.
    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(&id)
    }

    /// Returns true if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if `id` is a live group.
    pub fn is_group(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(LayoutNode::is_group)
    }

    /// Direct children of `id`; empty for leaves and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .and_then(LayoutNode::as_group)
            .map(|group| group.children())
            .unwrap_or(&[])
    }

    /// Leaves that belong to no theme, in display order.
    pub fn free_nodes(&self) -> &[NodeId] {
        &self.free_nodes
    }

    /// The leaf bound to `object`.
    pub fn leaf_for(&self, object: ObjectId) -> Option<NodeId> {
        self.object_index.get(&object).copied()
    }

    /// Number of registered objects.
    pub fn object_count(&self) -> usize {
        self.object_index.len()
    }

    /// The selection anchor, if it still exists.
    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected.filter(|id| self.nodes.contains_key(id))
    }

    /// Sets or clears the selection anchor.
    pub fn select_node(&mut self, node: Option<NodeId>) {
        self.selected = node;
    }

    /// Pre-order list of `id` and all of its descendants.
    pub fn preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if !self.nodes.contains_key(&id) {
            return order;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        order
    }

    /// Objects of every leaf at or below `id`, in display order.
    pub fn leaf_objects_under(&self, id: NodeId) -> Vec<ObjectId> {
        self.preorder(id)
            .into_iter()
            .filter_map(|n| self.nodes.get(&n).and_then(LayoutNode::object))
            .collect()
    }

    /// Registers `object` and places its new leaf at the end of the free list.
    ///
    /// Returns `None` if the object already has a leaf.
    pub fn add_object(&mut self, object: ObjectId) -> Option<NodeId> {
        if self.object_index.contains_key(&object) {
            warn!("object {object} is already in the grouping tree");
            return None;
        }
        let leaf = LayoutNode::new_leaf(object);
        let leaf_id = leaf.id;
        self.nodes.insert(leaf_id, leaf);
        self.object_index.insert(object, leaf_id);
        self.free_nodes.push(leaf_id);
        self.recompute_layout();
        Some(leaf_id)
    }

    /// Drops the leaf of `object` from whichever container holds it.
    ///
    /// Returns false if the object was unknown.
    pub fn remove_object(&mut self, object: ObjectId) -> bool {
        let Some(leaf) = self.object_index.remove(&object) else {
            return false;
        };
        self.detach(leaf);
        self.nodes.remove(&leaf);
        if self.selected == Some(leaf) {
            self.selected = None;
        }
        if self.grabbed.as_ref().is_some_and(|grab| grab.node == leaf) {
            self.grabbed = None;
        }
        self.recompute_layout();
        true
    }

    /// Creates a theme and moves the leaves of `selected` into it.
    ///
    /// The theme nests under the selection anchor when that is a group, otherwise under the
    /// root. Each leaf is prepended in turn, so the last object of `selected` ends up first.
    /// Objects whose type is listed in `excluded_types` stay where they are. The anchor is
    /// reset to the root afterwards.
    pub fn group_selected<'a>(
        &mut self,
        selected: impl IntoIterator<Item = &'a LayoutObject>,
        excluded_types: &[String],
    ) -> NodeId {
        let parent = match self.selected_node() {
            Some(anchor) if self.is_group(anchor) => anchor,
            _ => self.root,
        };

        let group = LayoutNode::new_group();
        let group_id = group.id;
        self.nodes.insert(group_id, group);
        self.attach_to_group(parent, group_id);

        let mut moved = 0;
        for object in selected {
            if excluded_types.iter().any(|t| *t == object.type_name) {
                continue;
            }
            let Some(leaf) = self.leaf_for(object.id) else {
                continue;
            };
            self.detach(leaf);
            self.attach_to_group(group_id, leaf);
            moved += 1;
        }

        self.selected = Some(self.root);
        debug!("created theme {group_id} under {parent} with {moved} objects");
        self.recompute_layout();
        group_id
    }

    /// Removes the current selection anchor from the tree.
    pub fn remove_selected(&mut self) {
        self.remove_selection(self.selected);
    }

    /// Removes `anchor` from the grouping.
    ///
    /// A group releases every leaf below it to the free list and discards its nested groups;
    /// the root is emptied but kept. A grouped leaf moves to the free list. Free leaves and
    /// unknown ids are left alone.
    pub fn remove_selection(&mut self, anchor: Option<NodeId>) {
        let Some(anchor) = anchor else {
            return;
        };
        let Some(node) = self.nodes.get(&anchor) else {
            return;
        };
        let (is_group, has_parent) = (node.is_group(), node.parent.is_some());

        if is_group {
            let released = self.release_descendants(anchor);
            if anchor != self.root {
                self.detach(anchor);
                self.nodes.remove(&anchor);
                if self.selected == Some(anchor) {
                    self.selected = None;
                }
            }
            debug!("removed theme {anchor}, released {released} objects");
        } else if has_parent {
            self.detach(anchor);
            self.free_nodes.push(anchor);
            if self.selected == Some(anchor) {
                self.selected = None;
            }
        } else {
            return;
        }
        self.recompute_layout();
    }

    /// Discards every node and reinstates an empty root.
    pub fn reset(&mut self) {
        *self = Self::new(self.metrics);
    }

    /// Empties `group`: leaves go to the free list in pre-order, nested groups are dropped.
    ///
    /// Returns the number of leaves released.
    fn release_descendants(&mut self, group: NodeId) -> usize {
        let descendants = self.preorder(group);
        let mut released = 0;
        for id in descendants.into_iter().skip(1) {
            let is_group = self.is_group(id);
            if is_group {
                self.nodes.remove(&id);
                if self.selected == Some(id) {
                    self.selected = None;
                }
            } else if let Some(node) = self.nodes.get_mut(&id) {
                node.parent = None;
                self.free_nodes.push(id);
                released += 1;
            }
        }
        if let Some(group) = self.nodes.get_mut(&group).and_then(LayoutNode::as_group_mut) {
            group.take_children();
        }
        released
    }

    /// Takes `id` out of its container, reporting where it was.
    ///
    /// Returns `None` if the node was in no container.
    pub(super) fn detach(&mut self, id: NodeId) -> Option<Placement> {
        if let Some(index) = self.free_nodes.iter().position(|n| *n == id) {
            self.free_nodes.remove(index);
            return Some(Placement::Free { index });
        }
        let parent = self.nodes.get(&id)?.parent?;
        let index = self
            .nodes
            .get_mut(&parent)
            .and_then(LayoutNode::as_group_mut)
            .and_then(|group| {
                let index = group.position_of(id)?;
                group.remove_child(id);
                Some(index)
            });
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
        index.map(|index| Placement::Group { parent, index })
    }

    /// Adds `child` to `parent` using the default group placement.
    pub(super) fn attach_to_group(&mut self, parent: NodeId, child: NodeId) -> Placement {
        let child_is_group = self.is_group(child);
        let index = self
            .nodes
            .get_mut(&parent)
            .and_then(LayoutNode::as_group_mut)
            .map(|group| group.attach(child, child_is_group));
        match index {
            Some(index) => {
                self.set_parent(child, Some(parent));
                Placement::Group { parent, index }
            }
            None => self.fallback_attach(child),
        }
    }

    /// Inserts `child` into `parent` at `index` (clamped).
    pub(super) fn insert_into_group(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Placement {
        let placed = self
            .nodes
            .get_mut(&parent)
            .and_then(LayoutNode::as_group_mut)
            .map(|group| {
                group.insert_child_before(index, child);
                index.min(group.len() - 1)
            });
        match placed {
            Some(index) => {
                self.set_parent(child, Some(parent));
                Placement::Group { parent, index }
            }
            None => self.fallback_attach(child),
        }
    }

    /// Inserts a leaf into the free list at `index` (clamped). A theme goes under the root.
    pub(super) fn insert_free(&mut self, index: usize, child: NodeId) -> Placement {
        if self.is_group(child) {
            return self.attach_to_group(self.root, child);
        }
        let index = index.min(self.free_nodes.len());
        self.free_nodes.insert(index, child);
        self.set_parent(child, None);
        Placement::Free { index }
    }

    /// Appends a leaf to the free list.
    pub(super) fn push_free(&mut self, child: NodeId) -> Placement {
        self.insert_free(usize::MAX, child)
    }

    /// Where a node goes when its intended container is not a live group.
    fn fallback_attach(&mut self, child: NodeId) -> Placement {
        if self.is_group(child) {
            self.attach_to_group(self.root, child)
        } else {
            self.push_free(child)
        }
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
        }
    }
}
