//! Theme grouping of layout objects.
//!
//! Objects are organised into a tree of themes rooted at a single root theme. Objects that
//! belong to no theme sit in a separate free list shown below the tree. The tree owns its
//! nodes in an arena keyed by [`NodeId`], lays them out as rows for the tree view, moves them
//! around by drag and drop, and converts to and from the document's edge list.

mod layout;
mod node;
mod reparent;
mod serialize;
mod tree;

pub use layout::{LayoutMetrics, LayoutSummary};
pub use node::{Group, LayoutNode, NodeId, NodeKind, Span};
pub use serialize::{GraphEdge, ROOT_GROUP_ID};
pub use tree::{GroupingTree, Placement};
