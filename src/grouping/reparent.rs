//! Drag and drop re-parenting of tree nodes.
//!
//! A drag is a two-step protocol: [`GroupingTree::grab`] detaches the pressed node, and
//! [`GroupingTree::release`] decides where it lands from the pointer's vertical position.
//! Release reads the spans of the layout pass that ran before the grab, i.e. the rows the
//! user actually saw while dragging. The grab itself never re-runs layout.

use super::node::NodeId;
use super::tree::{GroupingTree, Placement};
use log::debug;
use std::collections::VecDeque;

/// A node held between grab and release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GrabState {
    pub(crate) node: NodeId,
    /// Where the node sat before the grab, if it was in a container
    pub(crate) origin: Option<Placement>,
}

impl GroupingTree {
    /// The node currently held by a drag, if any.
    pub fn grabbed(&self) -> Option<NodeId> {
        self.grabbed.map(|grab| grab.node)
    }

    /// Detaches `node` and holds it until [`release`](Self::release).
    ///
    /// The root cannot be grabbed. Grabbing while another node is held puts the earlier node
    /// back first. Returns whether a node is now held.
    pub fn grab(&mut self, node: NodeId) -> bool {
        if node == self.root || !self.nodes.contains_key(&node) {
            return false;
        }
        if self.grabbed.is_some() {
            self.cancel_grab();
        }
        let origin = self.detach(node);
        self.grabbed = Some(GrabState { node, origin });
        true
    }

    /// Drops the held node at vertical position `target_y`.
    ///
    /// Rules, first match wins:
    /// 1. on or above the root's header row: child of the root;
    /// 2. inside the root's subtree: breadth-first search for the deepest theme whose header
    ///    or leaf row is hit (leaves are inserted right before the hit leaf);
    /// 3. in the gap above the free list, or any drop of a theme further down: child of the
    ///    root;
    /// 4. a leaf below the separator: before the free leaf it hits, else at the end.
    ///
    /// A search in rule 2 that hits nothing, e.g. on the rows the held node used to occupy,
    /// parks a leaf at the end of the free list and puts a theme under the root. Themes never
    /// enter the free list.
    ///
    /// Returns where the node landed, or `None` when nothing was held.
    pub fn release(&mut self, target_y: i32) -> Option<Placement> {
        let grab = self.grabbed.take()?;
        let node = grab.node;
        if !self.nodes.contains_key(&node) {
            return None;
        }
        // An edit made while holding may have placed the node again
        self.detach(node);
        let is_group = self.is_group(node);
        let root = self.root;
        let (root_header, root_span) = match self.nodes.get(&root) {
            Some(root_node) => (root_node.header, root_node.span),
            None => return None,
        };
        let separator = self.summary.separator;

        let placement = if target_y < root_header.end {
            self.attach_to_group(root, node)
        } else if target_y < root_span.end {
            match self.drop_into_subtree(node, is_group, target_y) {
                Some(placement) => placement,
                None if is_group => self.attach_to_group(root, node),
                None => self.push_free(node),
            }
        } else if target_y < separator.end || is_group {
            self.attach_to_group(root, node)
        } else {
            let hit = self.free_nodes.iter().position(|free| {
                self.nodes
                    .get(free)
                    .is_some_and(|free_node| free_node.span.contains(target_y))
            });
            match hit {
                Some(index) => self.insert_free(index, node),
                None => self.push_free(node),
            }
        };

        debug!("dropped {node} at y={target_y}: {placement:?}");
        self.recompute_layout();
        Some(placement)
    }

    /// Puts the held node back where it was grabbed from.
    ///
    /// If the original group no longer exists, a theme goes under the root and a leaf to
    /// the end of the free list.
    pub fn cancel_grab(&mut self) -> Option<Placement> {
        let grab = self.grabbed.take()?;
        if !self.nodes.contains_key(&grab.node) {
            return None;
        }
        self.detach(grab.node);
        let placement = match grab.origin {
            Some(Placement::Group { parent, index }) if self.is_group(parent) => {
                self.insert_into_group(parent, index, grab.node)
            }
            Some(Placement::Free { index }) if !self.is_group(grab.node) => {
                self.insert_free(index, grab.node)
            }
            _ if self.is_group(grab.node) => self.attach_to_group(self.root, grab.node),
            _ => self.push_free(grab.node),
        };
        self.recompute_layout();
        Some(placement)
    }

    /// Press-and-release in one call, as done when a dragged row is let go.
    ///
    /// Releasing over the node's own rows leaves it in place and returns `None`.
    pub fn drag_node(&mut self, node: NodeId, target_y: i32) -> Option<Placement> {
        let span = self.nodes.get(&node)?.span;
        if span.contains(target_y) {
            return None;
        }
        if !self.grab(node) {
            return None;
        }
        self.release(target_y)
    }

    fn drop_into_subtree(&mut self, node: NodeId, is_group: bool, y: i32) -> Option<Placement> {
        let mut queue = VecDeque::from([self.root]);
        while let Some(current) = queue.pop_front() {
            let header = self.nodes.get(&current)?.header;
            if header.contains(y) {
                return Some(self.attach_to_group(current, node));
            }

            let hit = self.children(current).iter().enumerate().find_map(|(index, child)| {
                let child_node = self.nodes.get(child)?;
                child_node
                    .span
                    .contains(y)
                    .then_some((index, *child, child_node.is_group()))
            });
            match hit {
                Some((_, child, true)) => queue.push_back(child),
                Some(_) if is_group => return Some(self.attach_to_group(current, node)),
                Some((index, _, false)) => {
                    return Some(self.insert_into_group(current, index, node))
                }
                None => {}
            }
        }
        None
    }
}
