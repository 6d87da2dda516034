//! Edge-list encoding of the grouping tree.
//!
//! Themes are numbered -1, -2, ... in pre-order, -1 being the root. Leaves are named by the
//! index of their object in the document's object list. Every non-root node in the root's
//! subtree contributes one `[parent, child]` edge; free leaves contribute nothing. The sign
//! of an id is what tells a theme from an object.

use super::node::{LayoutNode, NodeId};
use super::tree::GroupingTree;
use crate::error::{Corruption, LayoutError};
use crate::types::ObjectId;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Id of the root theme in an edge list.
pub const ROOT_GROUP_ID: i32 = -1;

/// One `[parent, child]` link, stored as a two-element JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge(pub i32, pub i32);

impl GraphEdge {
    /// Theme id of the parent.
    pub fn parent(&self) -> i32 {
        self.0
    }

    /// Theme id (negative) or object index (non-negative) of the child.
    pub fn child(&self) -> i32 {
        self.1
    }
}

impl GroupingTree {
    /// Encodes the root's subtree as edges, naming leaves by their index in `objects`.
    pub fn export_edges(&self, objects: &[ObjectId]) -> Vec<GraphEdge> {
        let object_index: HashMap<ObjectId, usize> =
            objects.iter().enumerate().map(|(i, o)| (*o, i)).collect();

        let order = self.preorder(self.root);
        let mut group_ids = HashMap::new();
        let mut next_id = ROOT_GROUP_ID;
        for id in &order {
            if self.is_group(*id) {
                group_ids.insert(*id, next_id);
                next_id -= 1;
            }
        }

        let mut edges = Vec::new();
        for id in order.iter().skip(1) {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let Some(parent) = node.parent.and_then(|p| group_ids.get(&p).copied()) else {
                continue;
            };
            let child = match node.object() {
                None => match group_ids.get(id) {
                    Some(group_id) => *group_id,
                    None => continue,
                },
                Some(object) => match object_index.get(&object) {
                    Some(index) => *index as i32,
                    None => {
                        warn!("object {object} is grouped but missing from the export list");
                        continue;
                    }
                },
            };
            edges.push(GraphEdge(parent, child));
        }
        debug!("exported {} grouping edges", edges.len());
        edges
    }

    /// Rebuilds themes from `edges`, resolving object indices through `objects`.
    ///
    /// Every object must already have a leaf. Children are appended in edge order, so an
    /// exported list comes back with the same child order. The edge list is checked in full
    /// before anything changes; on error the tree is left as it was.
    pub fn import_edges(
        &mut self,
        objects: &[ObjectId],
        edges: &[GraphEdge],
    ) -> Result<(), LayoutError> {
        self.validate_edges(objects, edges)?;

        let mut groups: HashMap<i32, NodeId> = HashMap::from([(ROOT_GROUP_ID, self.root)]);
        for edge in edges {
            for id in [edge.parent(), edge.child()] {
                if id < 0 && !groups.contains_key(&id) {
                    let group = LayoutNode::new_group();
                    groups.insert(id, group.id);
                    self.nodes.insert(group.id, group);
                }
            }
        }

        for edge in edges {
            let Some(parent) = groups.get(&edge.parent()).copied() else {
                continue;
            };
            let child = if edge.child() < 0 {
                groups.get(&edge.child()).copied()
            } else {
                objects
                    .get(edge.child() as usize)
                    .and_then(|object| self.leaf_for(*object))
            };
            let Some(child) = child else {
                continue;
            };
            self.detach(child);
            self.insert_into_group(parent, usize::MAX, child);
        }

        debug!(
            "imported {} grouping edges into {} themes",
            edges.len(),
            groups.len()
        );
        self.recompute_layout();
        Ok(())
    }

    fn validate_edges(&self, objects: &[ObjectId], edges: &[GraphEdge]) -> Result<(), Corruption> {
        let mut children_seen = HashSet::new();
        let mut group_links: HashMap<i32, Vec<i32>> = HashMap::new();
        let mut groups_seen = Vec::new();

        for &GraphEdge(parent, child) in edges {
            if parent >= 0 {
                return Err(Corruption::ObjectAsParent { parent, child });
            }
            if child == ROOT_GROUP_ID {
                return Err(Corruption::RootAsChild { parent });
            }
            if child >= 0 {
                let object = objects
                    .get(child as usize)
                    .ok_or(Corruption::IndexOutOfRange {
                        index: child,
                        len: objects.len(),
                    })?;
                if self.leaf_for(*object).is_none() {
                    return Err(Corruption::UnregisteredObject { index: child });
                }
            }
            if !children_seen.insert(child) {
                return Err(Corruption::DuplicateChild { child });
            }

            if !groups_seen.contains(&parent) {
                groups_seen.push(parent);
            }
            if child < 0 {
                group_links.entry(parent).or_default().push(child);
                if !groups_seen.contains(&child) {
                    groups_seen.push(child);
                }
            }
        }

        let mut reachable = HashSet::from([ROOT_GROUP_ID]);
        let mut stack = vec![ROOT_GROUP_ID];
        while let Some(group) = stack.pop() {
            for child in group_links.get(&group).into_iter().flatten() {
                if reachable.insert(*child) {
                    stack.push(*child);
                }
            }
        }
        match groups_seen.into_iter().find(|g| !reachable.contains(g)) {
            Some(group) => Err(Corruption::UnreachableGroup { group }),
            None => Ok(()),
        }
    }
}
