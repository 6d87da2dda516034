//! Node types stored in the grouping tree.
//!
//! A node is either a [`Group`] (a theme container with ordered children) or a leaf bound to
//! exactly one layout object. Nodes never own each other directly: children are referenced by
//! [`NodeId`] and resolved through the tree's arena, so a stale id simply fails to resolve.

use crate::types::ObjectId;
use uuid::Uuid;

/// Unique identifier for grouping tree nodes.
pub type NodeId = Uuid;

/// Half-open vertical extent `[start, end)` in tree-view pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// First pixel row covered by the span
    pub start: i32,
    /// One past the last pixel row covered by the span
    pub end: i32,
}

impl Span {
    /// Creates a span covering `[start, end)`.
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Returns true if `y` lies inside the span.
    pub fn contains(&self, y: i32) -> bool {
        y >= self.start && y < self.end
    }

    /// Returns true if `other` lies entirely inside this span.
    pub fn encloses(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Returns true if the two spans share at least one row.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Height of the span in pixels.
    pub fn height(&self) -> i32 {
        self.end - self.start
    }
}

/// Ordered child list of a theme group. Order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    children: Vec<NodeId>,
}

impl Group {
    /// The children in display order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the group has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Adds `child` after every existing child.
    pub fn append_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    /// Adds `child` before every existing child.
    pub fn prepend_child(&mut self, child: NodeId) {
        self.children.insert(0, child);
    }

    /// Inserts `child` at `index`, shifting later children back.
    ///
    /// An index past the end appends.
    pub fn insert_child_before(&mut self, index: usize, child: NodeId) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// Removes `child` if present. Returns whether anything was removed.
    pub fn remove_child(&mut self, child: NodeId) -> bool {
        match self.position_of(child) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    /// Index of `child` among the direct children.
    pub fn position_of(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|c| *c == child)
    }

    /// Default placement: nested groups go to the back, leaves to the front.
    ///
    /// Returns the index the child ended up at.
    pub fn attach(&mut self, child: NodeId, child_is_group: bool) -> usize {
        if child_is_group {
            self.append_child(child);
            self.children.len() - 1
        } else {
            self.prepend_child(child);
            0
        }
    }

    pub(crate) fn take_children(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.children)
    }
}

/// The two node variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A theme container
    Group(Group),
    /// A node wrapping one layout object
    Leaf {
        /// The object this leaf stands for
        object: ObjectId,
    },
}

/// A node of the grouping tree together with its cached layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutNode {
    /// Unique identifier for this node
    pub id: NodeId,
    /// Containing group; `None` for the root and for free leaves
    pub parent: Option<NodeId>,
    /// Full extent: the header row plus every descendant row
    pub span: Span,
    /// The node's own row
    pub header: Span,
    /// Nesting level, 0 for the root and for free leaves
    pub depth: u32,
    /// Group or leaf payload
    pub kind: NodeKind,
}

impl LayoutNode {
    /// Creates an empty, detached group.
    pub fn new_group() -> Self {
        Self::with_kind(NodeKind::Group(Group::default()))
    }

    /// Creates a detached leaf bound to `object`.
    pub fn new_leaf(object: ObjectId) -> Self {
        Self::with_kind(NodeKind::Leaf { object })
    }

    fn with_kind(kind: NodeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent: None,
            span: Span::default(),
            header: Span::default(),
            depth: 0,
            kind,
        }
    }

    /// Returns true for group nodes.
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    /// Group payload, if this node is a group.
    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            NodeKind::Group(group) => Some(group),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Mutable group payload, if this node is a group.
    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match &mut self.kind {
            NodeKind::Group(group) => Some(group),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// The wrapped object, if this node is a leaf.
    pub fn object(&self) -> Option<ObjectId> {
        match self.kind {
            NodeKind::Leaf { object } => Some(object),
            NodeKind::Group(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<NodeId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_span_contains_is_half_open() {
        let span = Span::new(25, 50);
        assert!(span.contains(25));
        assert!(span.contains(49));
        assert!(!span.contains(50));
        assert!(!span.contains(24));
        assert_eq!(span.height(), 25);
    }

    #[test]
    fn test_span_enclose_and_overlap() {
        let outer = Span::new(0, 100);
        let inner = Span::new(25, 50);
        let after = Span::new(50, 75);
        assert!(outer.encloses(&inner));
        assert!(!inner.encloses(&outer));
        assert!(!inner.overlaps(&after));
        assert!(outer.overlaps(&after));
    }

    #[test]
    fn test_group_child_operations() {
        let n = ids(4);
        let mut group = Group::default();
        group.append_child(n[0]);
        group.prepend_child(n[1]);
        group.insert_child_before(1, n[2]);
        assert_eq!(group.children(), &[n[1], n[2], n[0]]);

        group.insert_child_before(99, n[3]);
        assert_eq!(group.children(), &[n[1], n[2], n[0], n[3]]);

        assert!(group.remove_child(n[2]));
        assert_eq!(group.children(), &[n[1], n[0], n[3]]);
    }

    #[test]
    fn test_remove_missing_child_is_noop() {
        let n = ids(2);
        let mut group = Group::default();
        group.append_child(n[0]);
        assert!(!group.remove_child(n[1]));
        assert_eq!(group.children(), &[n[0]]);
    }

    #[test]
    fn test_attach_orders_groups_back_and_leaves_front() {
        let n = ids(4);
        let mut group = Group::default();
        assert_eq!(group.attach(n[0], false), 0);
        assert_eq!(group.attach(n[1], true), 1);
        assert_eq!(group.attach(n[2], false), 0);
        assert_eq!(group.attach(n[3], true), 3);
        assert_eq!(group.children(), &[n[2], n[0], n[1], n[3]]);
    }

    #[test]
    fn test_node_capability_checks() {
        let object = Uuid::new_v4();
        let mut leaf = LayoutNode::new_leaf(object);
        let mut group = LayoutNode::new_group();

        assert!(!leaf.is_group());
        assert_eq!(leaf.object(), Some(object));
        assert!(leaf.as_group_mut().is_none());

        assert!(group.is_group());
        assert_eq!(group.object(), None);
        assert!(group.as_group_mut().is_some());
        assert_ne!(leaf.id, group.id);
    }
}
