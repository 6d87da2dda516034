//! Vertical layout of the grouping tree view.
//!
//! Rows are stacked top to bottom in pre-order: the root header first, then each theme's
//! header followed by its children. Below the root's subtree sits a gap, a separator line,
//! and the free leaves one row each. The resulting spans are what drag and drop hit-tests
//! against.

use super::node::{NodeId, Span};
use super::tree::GroupingTree;
use crate::constants::{
    TREE_GAP_SIZE, TREE_NODE_HEIGHT, TREE_SEPARATOR_THICKNESS, TREE_TAB_SIZE,
};

/// Pixel sizes used by the layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    /// Height of one node row
    pub row_height: i32,
    /// Horizontal indent per nesting level
    pub indent: i32,
    /// Space between the root subtree and the separator
    pub gap: i32,
    /// Height of the separator line above the free list
    pub separator_thickness: i32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            row_height: TREE_NODE_HEIGHT,
            indent: TREE_TAB_SIZE,
            gap: TREE_GAP_SIZE,
            separator_thickness: TREE_SEPARATOR_THICKNESS,
        }
    }
}

impl LayoutMetrics {
    /// Left edge of a row at `depth`.
    pub fn indent_for(&self, depth: u32) -> i32 {
        self.indent * depth as i32
    }
}

/// Result of the most recent layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutSummary {
    /// Full extent of the root subtree
    pub root: Span,
    /// The separator line between the root subtree and the free list
    pub separator: Span,
    /// Extent of the free list rows
    pub free: Span,
    /// Total height the hosting view needs
    pub area_height: i32,
}

impl GroupingTree {
    /// Metrics the layout pass runs with.
    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    /// Replaces the metrics and lays the tree out again.
    pub fn set_metrics(&mut self, metrics: LayoutMetrics) {
        self.metrics = metrics;
        self.recompute_layout();
    }

    /// Summary of the last layout pass.
    pub fn layout_summary(&self) -> LayoutSummary {
        self.summary
    }

    /// Height of the tree view as of the last layout pass.
    pub fn area_height(&self) -> i32 {
        self.summary.area_height
    }

    /// Recomputes every span, depth and parent link from the tree shape.
    ///
    /// Returns the total height needed to show the tree.
    pub fn recompute_layout(&mut self) -> i32 {
        let row = self.metrics.row_height;
        let root_end = self.layout_subtree(self.root, None, 0, 0);

        let separator_start = root_end + self.metrics.gap;
        let separator = Span::new(
            separator_start,
            separator_start + self.metrics.separator_thickness,
        );

        let mut cursor = separator.end;
        for id in &self.free_nodes {
            if let Some(node) = self.nodes.get_mut(id) {
                let span = Span::new(cursor, cursor + row);
                node.parent = None;
                node.depth = 0;
                node.header = span;
                node.span = span;
            }
            cursor += row;
        }

        self.summary = LayoutSummary {
            root: Span::new(0, root_end),
            separator,
            free: Span::new(separator.end, cursor),
            area_height: cursor + row,
        };
        self.summary.area_height
    }

    /// The node whose own row covers `y`, searching the root subtree and then the free list.
    pub fn row_at(&self, y: i32) -> Option<NodeId> {
        self.preorder(self.root)
            .into_iter()
            .chain(self.free_nodes.iter().copied())
            .find(|id| self.nodes.get(id).is_some_and(|node| node.header.contains(y)))
    }

    fn layout_subtree(&mut self, id: NodeId, parent: Option<NodeId>, depth: u32, y: i32) -> i32 {
        if !self.nodes.contains_key(&id) {
            return y;
        }
        let children = self.children(id).to_vec();
        let header = Span::new(y, y + self.metrics.row_height);

        let mut cursor = header.end;
        for child in children {
            cursor = self.layout_subtree(child, Some(id), depth + 1, cursor);
        }

        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
            node.depth = depth;
            node.header = header;
            node.span = Span::new(y, cursor);
        }
        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LayoutObject;

    fn build() -> (GroupingTree, Vec<LayoutObject>, NodeId, NodeId) {
        let objects: Vec<LayoutObject> = (0..4)
            .map(|_| LayoutObject::new("display board", (0, 0), (40, 40)))
            .collect();
        let mut tree = GroupingTree::default();
        for object in &objects {
            tree.add_object(object.id);
        }
        let outer = tree.group_selected([&objects[0]], &[]);
        tree.select_node(Some(outer));
        let inner = tree.group_selected([&objects[1], &objects[2]], &[]);
        (tree, objects, outer, inner)
    }

    #[test]
    fn test_empty_tree_layout() {
        let mut tree = GroupingTree::default();
        let height = tree.recompute_layout();
        let summary = tree.layout_summary();

        assert_eq!(summary.root, Span::new(0, 25));
        assert_eq!(summary.separator, Span::new(55, 57));
        assert_eq!(height, 57 + 25);
        assert_eq!(tree.node(tree.root()).unwrap().header, Span::new(0, 25));
    }

    #[test]
    fn test_preorder_rows() {
        let (tree, objects, outer, inner) = build();
        // root, outer, a, inner, c, b
        let row = |id: NodeId| tree.node(id).unwrap().header.start / 25;
        assert_eq!(row(tree.root()), 0);
        assert_eq!(row(outer), 1);
        assert_eq!(row(tree.leaf_for(objects[0].id).unwrap()), 2);
        assert_eq!(row(inner), 3);
        assert_eq!(row(tree.leaf_for(objects[2].id).unwrap()), 4);
        assert_eq!(row(tree.leaf_for(objects[1].id).unwrap()), 5);

        assert_eq!(tree.node(inner).unwrap().span, Span::new(75, 150));
        assert_eq!(tree.node(outer).unwrap().span, Span::new(25, 150));
        assert_eq!(tree.node(inner).unwrap().depth, 2);
    }

    #[test]
    fn test_free_nodes_below_separator() {
        let (tree, objects, _, _) = build();
        let summary = tree.layout_summary();
        let free = tree.leaf_for(objects[3].id).unwrap();

        assert_eq!(summary.root, Span::new(0, 150));
        assert_eq!(summary.separator, Span::new(180, 182));
        assert_eq!(tree.node(free).unwrap().span, Span::new(182, 207));
        assert_eq!(tree.node(free).unwrap().depth, 0);
        assert_eq!(tree.area_height(), 207 + 25);
    }

    #[test]
    fn test_group_spans_contain_descendants() {
        let (tree, _, _, _) = build();
        for id in tree.preorder(tree.root()) {
            let node = tree.node(id).unwrap();
            let children = tree.children(id);
            for child in children {
                assert!(node.span.encloses(&tree.node(*child).unwrap().span));
            }
            for pair in children.windows(2) {
                let a = tree.node(pair[0]).unwrap().span;
                let b = tree.node(pair[1]).unwrap().span;
                assert!(!a.overlaps(&b));
                assert!(a.end <= b.start);
            }
        }
    }

    #[test]
    fn test_row_at() {
        let (tree, objects, outer, inner) = build();
        let free = tree.leaf_for(objects[3].id).unwrap();

        assert_eq!(tree.row_at(0), Some(tree.root()));
        assert_eq!(tree.row_at(24), Some(tree.root()));
        assert_eq!(tree.row_at(25), Some(outer));
        assert_eq!(tree.row_at(80), Some(inner));
        assert_eq!(tree.row_at(160), None);
        assert_eq!(tree.row_at(190), Some(free));
        assert_eq!(tree.row_at(207), None);
        assert_eq!(tree.row_at(-5), None);
    }

    #[test]
    fn test_custom_metrics() {
        let (mut tree, objects, _, _) = build();
        tree.set_metrics(LayoutMetrics {
            row_height: 10,
            indent: 5,
            gap: 4,
            separator_thickness: 1,
        });
        let free = tree.leaf_for(objects[3].id).unwrap();
        assert_eq!(tree.layout_summary().root, Span::new(0, 60));
        assert_eq!(tree.node(free).unwrap().span, Span::new(65, 75));
        assert_eq!(tree.metrics().indent_for(3), 15);
    }
}
