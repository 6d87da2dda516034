//! Error types for layout documents and the grouping graph.

use thiserror::Error;

/// Ways an imported grouping edge list can be malformed.
///
/// Indices are the raw values found in the edge list: object indices are `>= 0`, group ids
/// are negative with `-1` for the root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum Corruption {
    #[error("edge ({parent}, {child}) uses an object index as its parent")]
    ObjectAsParent { parent: i32, child: i32 },

    #[error("edge ({parent}, -1) makes the root a child")]
    RootAsChild { parent: i32 },

    #[error("object index {index} is out of range for {len} objects")]
    IndexOutOfRange { index: i32, len: usize },

    #[error("object index {index} has no node in the grouping tree")]
    UnregisteredObject { index: i32 },

    #[error("node {child} has more than one parent")]
    DuplicateChild { child: i32 },

    #[error("group {group} is not reachable from the root")]
    UnreachableGroup { group: i32 },
}

/// Errors produced by the grouping tree serializer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The edge list does not describe a valid tree; nothing was changed
    #[error("corrupt layout document: {0}")]
    CorruptDocument(#[from] Corruption),
}

/// Errors raised while reading or writing a layout document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The text is not valid JSON for a layout document
    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An object record has the wrong shape
    #[error("layout object {index} has a malformed record: {reason}")]
    InvalidObject {
        /// Position of the record in `layout_objects`
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// The grouping graph was rejected
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
