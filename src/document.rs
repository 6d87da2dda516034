//! The floorplan being edited and its JSON document format.
//!
//! A [`Floorplan`] keeps the object registry and the grouping tree in step: every object
//! has exactly one leaf, and removing an object removes its leaf. [`LayoutDocument`] is the
//! on-disk form: the outline polygon, the objects in registry order, and the grouping graph
//! as an edge list over those indices.

use crate::config::EditorConfig;
use crate::constants::PAINT_AREA_SIZE;
use crate::error::DocumentError;
use crate::grouping::{GraphEdge, GroupingTree, NodeId};
use crate::types::{LayoutObject, ObjectId, ObjectRegistry};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// One object as stored in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Index of the object; informational, the array position is authoritative
    #[serde(default)]
    pub id: usize,
    /// `[x, y]` of the top-left corner
    pub position: Vec<i32>,
    /// `[width, height]`
    pub size: Vec<i32>,
    /// Object type name
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ObjectRecord {
    fn from_object(index: usize, object: &LayoutObject) -> Self {
        Self {
            id: index,
            position: vec![object.position.0, object.position.1],
            size: vec![object.size.0, object.size.1],
            type_name: object.type_name.clone(),
        }
    }

    fn to_object(&self, index: usize) -> Result<LayoutObject, DocumentError> {
        let invalid = |reason: &str| DocumentError::InvalidObject {
            index,
            reason: reason.to_string(),
        };
        let &[x, y] = self.position.as_slice() else {
            return Err(invalid("position must have two coordinates"));
        };
        let &[w, h] = self.size.as_slice() else {
            return Err(invalid("size must have two values"));
        };
        if w < 0 || h < 0 {
            return Err(invalid("size must not be negative"));
        }
        Ok(LayoutObject::new(self.type_name.clone(), (x, y), (w, h)))
    }
}

/// Serialized form of a floorplan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Vertices of the outline polygon
    #[serde(default)]
    pub outline: Vec<(i32, i32)>,
    /// Objects in registry order
    #[serde(default)]
    pub layout_objects: Vec<ObjectRecord>,
    /// Grouping edges over object indices
    #[serde(default)]
    pub graph: Vec<GraphEdge>,
}

impl LayoutDocument {
    /// Serialize the document to a pretty JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The floorplan under edit: outline, objects and their theme grouping.
#[derive(Debug, Clone)]
pub struct Floorplan {
    /// Vertices of the outline polygon
    pub outline: Vec<(i32, i32)>,
    objects: ObjectRegistry,
    tree: GroupingTree,
    min_size: i32,
    ungroupable_types: Vec<String>,
}

impl Default for Floorplan {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Floorplan {
    /// Creates an empty floorplan using the sizes and rules of `config`.
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            outline: Vec::new(),
            objects: ObjectRegistry::new(),
            tree: GroupingTree::new(config.layout_metrics()),
            min_size: config.object_min_size,
            ungroupable_types: config.ungroupable_types.clone(),
        }
    }

    /// Picks up changed sizes and rules from `config`.
    pub fn apply_config(&mut self, config: &EditorConfig) {
        self.min_size = config.object_min_size;
        self.ungroupable_types = config.ungroupable_types.clone();
        self.tree.set_metrics(config.layout_metrics());
    }

    /// The objects in registry order.
    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    /// The grouping tree.
    pub fn tree(&self) -> &GroupingTree {
        &self.tree
    }

    /// Mutable access to the grouping tree, for drag and drop.
    pub fn tree_mut(&mut self) -> &mut GroupingTree {
        &mut self.tree
    }

    /// Returns true if there is nothing on the floorplan.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty() && self.objects.is_empty()
    }

    /// Adds `object` to the registry and as a free leaf of the tree.
    ///
    /// Objects smaller than the minimum size in both dimensions are dropped and `None` is
    /// returned.
    pub fn add_object(&mut self, object: LayoutObject) -> Option<ObjectId> {
        if object.is_too_small(self.min_size) {
            debug!(
                "ignored {} of size {:?}, below minimum {}",
                object.type_name, object.size, self.min_size
            );
            return None;
        }
        let id = self.objects.add(object);
        self.tree.add_object(id);
        Some(id)
    }

    /// Deletes every selected object from the registry and the tree.
    ///
    /// Returns the number of objects removed.
    pub fn remove_selected_objects(&mut self) -> usize {
        let removed = self.objects.remove_selected();
        for id in &removed {
            self.tree.remove_object(*id);
        }
        removed.len()
    }

    /// Removes the outline, every object and every theme.
    pub fn clear(&mut self) {
        self.outline.clear();
        self.objects.clear();
        self.tree.reset();
    }

    /// Makes `node` the tree anchor and selects the objects it covers.
    ///
    /// A leaf selects its object, a theme every object beneath it. `None` just clears the
    /// selection.
    pub fn select_tree_node(&mut self, node: Option<NodeId>) {
        self.objects.clear_selection();
        let node = node.filter(|id| self.tree.contains(*id));
        self.tree.select_node(node);
        let Some(node) = node else {
            return;
        };
        for id in self.tree.leaf_objects_under(node) {
            if let Some(object) = self.objects.get_mut(id) {
                object.is_selected = true;
            }
        }
    }

    /// Selects `object` on the canvas, keeping the other selections when `additive` is set.
    ///
    /// Clicking empty space (`None`) without `additive` clears the selection.
    pub fn select_object(&mut self, object: Option<ObjectId>, additive: bool) {
        if !additive {
            self.objects.clear_selection();
        }
        if let Some(object) = object.and_then(|id| self.objects.get_mut(id)) {
            object.is_selected = if additive { !object.is_selected } else { true };
        }
    }

    /// Deselects every object. The tree anchor is kept.
    pub fn clear_object_selection(&mut self) {
        self.objects.clear_selection();
    }

    /// Groups the selected objects into a new theme.
    pub fn make_theme(&mut self) -> NodeId {
        self.tree
            .group_selected(self.objects.selected(), &self.ungroupable_types)
    }

    /// Removes the tree anchor from the grouping.
    pub fn remove_tree_selection(&mut self) {
        self.tree.remove_selected();
    }

    /// Duplicates the selected objects, shifted by `offset`.
    ///
    /// A copy that would cross the far edge of the paint area is shifted back by the offset
    /// instead, or pushed against that edge when there is no room either way. The copies
    /// become the selection and join the free list as new leaves; the originals keep their
    /// places in the tree. Returns the ids of the copies.
    pub fn copy_selected(&mut self, offset: (i32, i32)) -> Vec<ObjectId> {
        let copies: Vec<LayoutObject> = self
            .objects
            .selected()
            .map(|o| {
                let position = (
                    copy_coordinate(o.position.0, o.size.0, offset.0),
                    copy_coordinate(o.position.1, o.size.1, offset.1),
                );
                let mut copy = LayoutObject::new(o.type_name.clone(), position, o.size);
                copy.is_selected = true;
                copy
            })
            .collect();
        self.objects.clear_selection();

        let ids: Vec<ObjectId> = copies
            .into_iter()
            .filter_map(|copy| self.add_object(copy))
            .collect();
        debug!("copied {} objects", ids.len());
        ids
    }

    /// Lines the selected objects up along the axis they are already closest to.
    ///
    /// Objects spread more vertically than horizontally get a shared x, otherwise a shared y,
    /// both the mean of the selection. With `distribute` the objects are also spaced evenly
    /// along the other axis between the first and last one, keeping their order. Returns
    /// false when nothing moved: fewer than two objects selected, or too little room to
    /// leave a gap between them.
    pub fn align_selected(&mut self, distribute: bool) -> bool {
        let selected: Vec<(ObjectId, (i32, i32), (i32, i32))> = self
            .objects
            .selected()
            .map(|o| (o.id, o.position, o.size))
            .collect();
        if selected.len() < 2 {
            return false;
        }

        let n = selected.len() as i64;
        let mean_x = (selected.iter().map(|&(_, (x, _), _)| x as i64).sum::<i64>() / n) as i32;
        let mean_y = (selected.iter().map(|&(_, (_, y), _)| y as i64).sum::<i64>() / n) as i32;
        let spread_x: i64 = selected
            .iter()
            .map(|&(_, (x, _), _)| (x - mean_x).abs() as i64)
            .sum();
        let spread_y: i64 = selected
            .iter()
            .map(|&(_, (_, y), _)| (y - mean_y).abs() as i64)
            .sum();
        let column = spread_x < spread_y;

        if !distribute {
            for (id, ..) in &selected {
                if let Some(object) = self.objects.get_mut(*id) {
                    if column {
                        object.position.0 = mean_x;
                    } else {
                        object.position.1 = mean_y;
                    }
                }
            }
            return true;
        }

        // Coordinate and extent along the line
        let along = |&(_, (x, y), (w, h)): &(ObjectId, (i32, i32), (i32, i32))| {
            if column {
                (y, h)
            } else {
                (x, w)
            }
        };
        let mut ordered = selected;
        ordered.sort_by_key(|s| along(s).0);
        let first = along(&ordered[0]).0;
        let last = along(&ordered[ordered.len() - 1]).0;
        let occupied: i32 = ordered[..ordered.len() - 1].iter().map(|s| along(s).1).sum();
        let gap = (last - first - occupied) / (ordered.len() as i32 - 1);
        if gap <= 0 {
            debug!("not distributing: {} objects leave no gap", ordered.len());
            return false;
        }

        let mut ruler = first;
        for s in &ordered {
            let extent = along(s).1;
            if let Some(object) = self.objects.get_mut(s.0) {
                object.position = if column {
                    (mean_x, ruler)
                } else {
                    (ruler, mean_y)
                };
            }
            ruler += extent + gap;
        }
        true
    }

    /// Scales the outline and every object about the origin by `ratio`, rounding to whole
    /// units. Non-positive or non-finite ratios are ignored.
    pub fn global_scale(&mut self, ratio: f32) {
        if !ratio.is_finite() || ratio <= 0.0 {
            warn!("ignoring scale ratio {ratio}");
            return;
        }
        let scale = |v: i32| (v as f32 * ratio).round() as i32;
        for point in &mut self.outline {
            *point = (scale(point.0), scale(point.1));
        }
        for object in self.objects.iter_mut() {
            object.position = (scale(object.position.0), scale(object.position.1));
            object.size = (scale(object.size.0), scale(object.size.1));
        }
        debug!("scaled floorplan by {ratio}");
    }

    /// Moves the selected objects by `delta`. With `total` the outline and every object
    /// move instead.
    pub fn multi_move(&mut self, delta: (i32, i32), total: bool) {
        if total {
            for point in &mut self.outline {
                *point = (point.0 + delta.0, point.1 + delta.1);
            }
        }
        for object in self.objects.iter_mut() {
            if total || object.is_selected {
                object.position = (object.position.0 + delta.0, object.position.1 + delta.1);
            }
        }
    }

    /// Gives every selected object the given width and/or height.
    ///
    /// Negative values are ignored. Returns the number of objects resized.
    pub fn resize_selected(&mut self, width: Option<i32>, height: Option<i32>) -> usize {
        let width = width.filter(|w| *w >= 0);
        let height = height.filter(|h| *h >= 0);
        if width.is_none() && height.is_none() {
            return 0;
        }
        let mut resized = 0;
        for object in self.objects.iter_mut().filter(|o| o.is_selected) {
            object.size = (width.unwrap_or(object.size.0), height.unwrap_or(object.size.1));
            resized += 1;
        }
        resized
    }

    /// The topmost object at `point`, i.e. the last one added.
    pub fn object_at(&self, point: (f32, f32)) -> Option<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.contains_point(point))
            .last()
            .map(|o| o.id)
    }

    /// Builds the serialized form.
    pub fn to_document(&self) -> LayoutDocument {
        let ids = self.objects.ids();
        LayoutDocument {
            outline: self.outline.clone(),
            layout_objects: self
                .objects
                .iter()
                .enumerate()
                .map(|(i, o)| ObjectRecord::from_object(i, o))
                .collect(),
            graph: self.tree.export_edges(&ids),
        }
    }

    /// Replaces the whole floorplan with `document`.
    ///
    /// The document is loaded into a fresh floorplan first; on any error the current one is
    /// left untouched.
    pub fn load_document(&mut self, document: &LayoutDocument) -> Result<(), DocumentError> {
        let mut loaded = Self {
            outline: document.outline.clone(),
            objects: ObjectRegistry::new(),
            tree: GroupingTree::new(self.tree.metrics()),
            min_size: self.min_size,
            ungroupable_types: self.ungroupable_types.clone(),
        };
        for (index, record) in document.layout_objects.iter().enumerate() {
            let id = loaded.objects.add(record.to_object(index)?);
            loaded.tree.add_object(id);
        }
        let ids = loaded.objects.ids();
        loaded.tree.import_edges(&ids, &document.graph)?;

        info!(
            "loaded floorplan with {} objects and {} grouping edges",
            ids.len(),
            document.graph.len()
        );
        *self = loaded;
        Ok(())
    }

    /// Serialize the floorplan to a pretty JSON document
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(self.to_document().to_json()?)
    }

    /// Replaces the floorplan with the JSON document in `json`.
    pub fn load_json(&mut self, json: &str) -> Result<(), DocumentError> {
        let document = LayoutDocument::from_json(json)?;
        self.load_document(&document)
    }

    /// Builds a floorplan from a JSON document using default settings.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let mut floorplan = Self::default();
        floorplan.load_json(json)?;
        Ok(floorplan)
    }
}

fn copy_coordinate(start: i32, extent: i32, offset: i32) -> i32 {
    if start + extent + offset < PAINT_AREA_SIZE {
        start + offset
    } else if start > offset {
        start - offset
    } else {
        PAINT_AREA_SIZE - extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Corruption, LayoutError};

    fn board(x: i32) -> LayoutObject {
        LayoutObject::new("display board", (x, 0), (40, 40))
    }

    fn select(floorplan: &mut Floorplan, ids: &[ObjectId]) {
        floorplan.select_object(None, false);
        for id in ids {
            floorplan.select_object(Some(*id), true);
        }
    }

    #[test]
    fn test_add_object_filters_tiny_objects() {
        let mut floorplan = Floorplan::default();

        assert!(floorplan
            .add_object(LayoutObject::new("entrance", (0, 0), (5, 5)))
            .is_none());
        let thin = floorplan.add_object(LayoutObject::new("support wall", (0, 0), (200, 4)));

        assert!(thin.is_some());
        assert_eq!(floorplan.objects().len(), 1);
        assert_eq!(floorplan.tree().free_nodes().len(), 1);
    }

    #[test]
    fn test_make_theme_scenario() {
        let mut floorplan = Floorplan::default();
        let _a = floorplan.add_object(board(0)).unwrap();
        let b = floorplan.add_object(board(50)).unwrap();
        let c = floorplan.add_object(board(100)).unwrap();
        let root = floorplan.tree().root();
        floorplan.select_tree_node(Some(root));
        select(&mut floorplan, &[b, c]);

        let theme = floorplan.make_theme();

        let tree = floorplan.tree();
        assert_eq!(tree.children(root), &[theme]);
        assert_eq!(
            tree.children(theme),
            &[tree.leaf_for(c).unwrap(), tree.leaf_for(b).unwrap()]
        );
        assert_eq!(
            floorplan.to_document().graph,
            vec![GraphEdge(-1, -2), GraphEdge(-2, 2), GraphEdge(-2, 1)]
        );
    }

    #[test]
    fn test_make_theme_skips_ungroupable() {
        let mut floorplan = Floorplan::default();
        let wall = floorplan
            .add_object(LayoutObject::new("support wall", (0, 0), (200, 10)))
            .unwrap();
        let b = floorplan.add_object(board(50)).unwrap();
        select(&mut floorplan, &[wall, b]);

        let theme = floorplan.make_theme();

        let tree = floorplan.tree();
        assert_eq!(tree.children(theme), &[tree.leaf_for(b).unwrap()]);
        assert_eq!(tree.free_nodes(), &[tree.leaf_for(wall).unwrap()]);
    }

    #[test]
    fn test_select_tree_node_selects_covered_objects() {
        let mut floorplan = Floorplan::default();
        let a = floorplan.add_object(board(0)).unwrap();
        let b = floorplan.add_object(board(50)).unwrap();
        let c = floorplan.add_object(board(100)).unwrap();
        select(&mut floorplan, &[a, b]);
        let theme = floorplan.make_theme();

        floorplan.select_tree_node(Some(theme));
        let selected: Vec<ObjectId> = floorplan.objects().selected().map(|o| o.id).collect();
        assert_eq!(selected, vec![a, b]);

        let leaf = floorplan.tree().leaf_for(c).unwrap();
        floorplan.select_tree_node(Some(leaf));
        let selected: Vec<ObjectId> = floorplan.objects().selected().map(|o| o.id).collect();
        assert_eq!(selected, vec![c]);
        assert_eq!(floorplan.tree().selected_node(), Some(leaf));

        floorplan.select_tree_node(None);
        assert_eq!(floorplan.objects().selected().count(), 0);
    }

    #[test]
    fn test_remove_selected_objects_updates_tree() {
        let mut floorplan = Floorplan::default();
        let a = floorplan.add_object(board(0)).unwrap();
        let b = floorplan.add_object(board(50)).unwrap();
        select(&mut floorplan, &[a, b]);
        let theme = floorplan.make_theme();
        select(&mut floorplan, &[a]);

        assert_eq!(floorplan.remove_selected_objects(), 1);

        let tree = floorplan.tree();
        assert_eq!(tree.leaf_for(a), None);
        assert_eq!(tree.children(theme), &[tree.leaf_for(b).unwrap()]);
        assert_eq!(floorplan.objects().ids(), vec![b]);
    }

    #[test]
    fn test_remove_tree_selection_releases_theme() {
        let mut floorplan = Floorplan::default();
        let a = floorplan.add_object(board(0)).unwrap();
        select(&mut floorplan, &[a]);
        let theme = floorplan.make_theme();
        floorplan.select_tree_node(Some(theme));

        floorplan.remove_tree_selection();

        assert!(!floorplan.tree().contains(theme));
        assert_eq!(floorplan.tree().free_nodes().len(), 1);
        assert_eq!(floorplan.objects().len(), 1);
    }

    #[test]
    fn test_object_at_prefers_last_added() {
        let mut floorplan = Floorplan::default();
        let below = floorplan.add_object(board(0)).unwrap();
        let above = floorplan.add_object(board(20)).unwrap();

        assert_eq!(floorplan.object_at((10.0, 10.0)), Some(below));
        assert_eq!(floorplan.object_at((30.0, 10.0)), Some(above));
        assert_eq!(floorplan.object_at((500.0, 500.0)), None);
    }

    #[test]
    fn test_additive_click_toggles() {
        let mut floorplan = Floorplan::default();
        let a = floorplan.add_object(board(0)).unwrap();
        let b = floorplan.add_object(board(50)).unwrap();

        floorplan.select_object(Some(a), false);
        floorplan.select_object(Some(b), true);
        assert_eq!(floorplan.objects().selected().count(), 2);

        floorplan.select_object(Some(a), true);
        let selected: Vec<ObjectId> = floorplan.objects().selected().map(|o| o.id).collect();
        assert_eq!(selected, vec![b]);

        floorplan.select_object(None, false);
        assert_eq!(floorplan.objects().selected().count(), 0);
    }

    #[test]
    fn test_document_json_shape() {
        let mut floorplan = Floorplan::default();
        floorplan.outline = vec![(0, 0), (100, 0), (100, 80)];
        let a = floorplan.add_object(board(5)).unwrap();
        select(&mut floorplan, &[a]);
        floorplan.make_theme();

        let value: serde_json::Value = serde_json::from_str(&floorplan.to_json().unwrap()).unwrap();

        assert_eq!(value["outline"], serde_json::json!([[0, 0], [100, 0], [100, 80]]));
        assert_eq!(
            value["layout_objects"],
            serde_json::json!([{"id": 0, "position": [5, 0], "size": [40, 40], "type": "display board"}])
        );
        assert_eq!(value["graph"], serde_json::json!([[-1, -2], [-2, 0]]));
    }

    #[test]
    fn test_load_document_round_trip() {
        let mut original = Floorplan::default();
        original.outline = vec![(0, 0), (300, 0), (300, 200), (0, 200)];
        let ids: Vec<ObjectId> = (0..4).map(|i| original.add_object(board(i * 50)).unwrap()).collect();
        select(&mut original, &[ids[0], ids[1]]);
        let outer = original.make_theme();
        original.select_tree_node(Some(outer));
        select(&mut original, &[ids[2]]);
        original.make_theme();
        let json = original.to_json().unwrap();

        let restored = Floorplan::from_json(&json).unwrap();

        assert_eq!(restored.outline, original.outline);
        assert_eq!(restored.objects().len(), 4);
        assert_eq!(restored.to_document(), original.to_document());
        assert_eq!(restored.tree().free_nodes().len(), 1);
    }

    #[test]
    fn test_missing_fields_load_empty() {
        let floorplan = Floorplan::from_json("{}").unwrap();
        assert!(floorplan.is_empty());
        assert!(floorplan.tree().children(floorplan.tree().root()).is_empty());
    }

    #[test]
    fn test_objects_without_graph_are_free() {
        let json = r#"{"layout_objects": [
            {"position": [0, 0], "size": [20, 20], "type": "entrance"},
            {"position": [30, 0], "size": [2, 2], "type": "entrance"}
        ]}"#;

        let floorplan = Floorplan::from_json(json).unwrap();

        // loading does not apply the size filter
        assert_eq!(floorplan.objects().len(), 2);
        assert_eq!(floorplan.tree().free_nodes().len(), 2);
    }

    #[test]
    fn test_failed_load_keeps_current_floorplan() {
        let mut floorplan = Floorplan::default();
        let a = floorplan.add_object(board(0)).unwrap();
        let json = r#"{
            "layout_objects": [{"position": [0, 0], "size": [20, 20], "type": "entrance"}],
            "graph": [[-1, 3]]
        }"#;

        let err = floorplan.load_json(json).unwrap_err();

        assert!(matches!(
            err,
            DocumentError::Layout(LayoutError::CorruptDocument(Corruption::IndexOutOfRange {
                index: 3,
                len: 1
            }))
        ));
        assert_eq!(floorplan.objects().ids(), vec![a]);
    }

    #[test]
    fn test_malformed_records_are_rejected() {
        let mut floorplan = Floorplan::default();
        let short = r#"{"layout_objects": [{"position": [0], "size": [20, 20], "type": "entrance"}]}"#;
        assert!(matches!(
            floorplan.load_json(short),
            Err(DocumentError::InvalidObject { index: 0, .. })
        ));
        assert!(matches!(
            floorplan.load_json("not json"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut floorplan = Floorplan::default();
        floorplan.outline.push((1, 1));
        let a = floorplan.add_object(board(0)).unwrap();
        select(&mut floorplan, &[a]);
        floorplan.make_theme();

        floorplan.clear();

        assert!(floorplan.is_empty());
        assert_eq!(floorplan.tree().node_count(), 1);
    }

    #[test]
    fn test_clear_object_selection_keeps_anchor() {
        let mut floorplan = Floorplan::default();
        let a = floorplan.add_object(board(0)).unwrap();
        select(&mut floorplan, &[a]);
        let theme = floorplan.make_theme();
        floorplan.select_tree_node(Some(theme));

        floorplan.clear_object_selection();

        assert_eq!(floorplan.objects().selected().count(), 0);
        assert_eq!(floorplan.tree().selected_node(), Some(theme));
    }

    fn positions(floorplan: &Floorplan) -> Vec<(i32, i32)> {
        floorplan.objects().iter().map(|o| o.position).collect()
    }

    #[test]
    fn test_copy_selected_adds_free_leaves() {
        let mut floorplan = Floorplan::default();
        let a = floorplan.add_object(board(0)).unwrap();
        let b = floorplan.add_object(board(50)).unwrap();
        select(&mut floorplan, &[a]);
        let theme = floorplan.make_theme();
        select(&mut floorplan, &[a]);

        let copies = floorplan.copy_selected((30, 30));

        assert_eq!(copies.len(), 1);
        let copy = floorplan.objects().get(copies[0]).unwrap();
        assert_ne!(copy.id, a);
        assert_eq!(copy.type_name, "display board");
        assert_eq!(copy.position, (30, 30));
        assert_eq!(copy.size, (40, 40));
        assert!(copy.is_selected);
        assert!(!floorplan.objects().get(a).unwrap().is_selected);

        let tree = floorplan.tree();
        assert_eq!(tree.children(theme), &[tree.leaf_for(a).unwrap()]);
        assert_eq!(
            tree.free_nodes(),
            &[tree.leaf_for(b).unwrap(), tree.leaf_for(copies[0]).unwrap()]
        );
    }

    #[test]
    fn test_copy_stays_inside_paint_area() {
        let mut floorplan = Floorplan::default();
        let near_edge = floorplan
            .add_object(LayoutObject::new("display board", (1000, 10), (40, 40)))
            .unwrap();
        let wide = floorplan
            .add_object(LayoutObject::new("support wall", (20, 0), (1010, 20)))
            .unwrap();
        select(&mut floorplan, &[near_edge, wide]);

        let copies = floorplan.copy_selected((30, 30));

        let objects = floorplan.objects();
        assert_eq!(objects.get(copies[0]).unwrap().position, (970, 40));
        assert_eq!(objects.get(copies[1]).unwrap().position, (14, 30));
    }

    #[test]
    fn test_copy_with_nothing_selected() {
        let mut floorplan = Floorplan::default();
        floorplan.add_object(board(0));

        assert!(floorplan.copy_selected((30, 30)).is_empty());
        assert_eq!(floorplan.objects().len(), 1);
    }

    #[test]
    fn test_align_row_shares_mean_y() {
        let mut floorplan = Floorplan::default();
        let ids: Vec<_> = [(0, 0), (50, 10), (100, 20)]
            .into_iter()
            .map(|p| {
                floorplan
                    .add_object(LayoutObject::new("display board", p, (40, 40)))
                    .unwrap()
            })
            .collect();
        select(&mut floorplan, &ids);

        assert!(floorplan.align_selected(false));
        assert_eq!(positions(&floorplan), vec![(0, 10), (50, 10), (100, 10)]);
    }

    #[test]
    fn test_align_column_shares_mean_x() {
        let mut floorplan = Floorplan::default();
        let ids: Vec<_> = [(10, 0), (0, 100), (20, 300)]
            .into_iter()
            .map(|p| {
                floorplan
                    .add_object(LayoutObject::new("display board", p, (40, 40)))
                    .unwrap()
            })
            .collect();
        select(&mut floorplan, &ids);

        assert!(floorplan.align_selected(false));
        assert_eq!(positions(&floorplan), vec![(10, 0), (10, 100), (10, 300)]);
    }

    #[test]
    fn test_distribute_spaces_evenly() {
        let mut floorplan = Floorplan::default();
        let a = floorplan.add_object(board(200)).unwrap();
        let b = floorplan.add_object(board(0)).unwrap();
        let c = floorplan.add_object(board(50)).unwrap();
        select(&mut floorplan, &[a, b, c]);

        assert!(floorplan.align_selected(true));
        // Width 40 each, 120 units between the outer two leave a gap of 60
        assert_eq!(positions(&floorplan), vec![(200, 0), (0, 0), (100, 0)]);
    }

    #[test]
    fn test_distribute_needs_room() {
        let mut floorplan = Floorplan::default();
        let ids: Vec<_> = [0, 10, 20]
            .into_iter()
            .map(|x| floorplan.add_object(board(x)).unwrap())
            .collect();
        select(&mut floorplan, &ids);

        assert!(!floorplan.align_selected(true));
        assert_eq!(positions(&floorplan), vec![(0, 0), (10, 0), (20, 0)]);

        select(&mut floorplan, &ids[..1]);
        assert!(!floorplan.align_selected(false));
    }

    #[test]
    fn test_global_scale() {
        let mut floorplan = Floorplan::default();
        floorplan.outline = vec![(0, 0), (100, 50)];
        floorplan.add_object(board(45));

        floorplan.global_scale(0.5);
        assert_eq!(floorplan.outline, vec![(0, 0), (50, 25)]);
        let object = floorplan.objects().iter().next().unwrap();
        assert_eq!(object.position, (23, 0));
        assert_eq!(object.size, (20, 20));

        floorplan.global_scale(0.0);
        floorplan.global_scale(f32::NAN);
        assert_eq!(floorplan.outline, vec![(0, 0), (50, 25)]);
    }

    #[test]
    fn test_multi_move_selected_or_total() {
        let mut floorplan = Floorplan::default();
        floorplan.outline = vec![(0, 0), (100, 0)];
        let a = floorplan.add_object(board(0)).unwrap();
        floorplan.add_object(board(50));
        select(&mut floorplan, &[a]);

        floorplan.multi_move((5, -3), false);
        assert_eq!(positions(&floorplan), vec![(5, -3), (50, 0)]);
        assert_eq!(floorplan.outline, vec![(0, 0), (100, 0)]);

        floorplan.multi_move((1, 1), true);
        assert_eq!(positions(&floorplan), vec![(6, -2), (51, 1)]);
        assert_eq!(floorplan.outline, vec![(1, 1), (101, 1)]);
    }

    #[test]
    fn test_resize_selected() {
        let mut floorplan = Floorplan::default();
        let a = floorplan.add_object(board(0)).unwrap();
        let b = floorplan.add_object(board(50)).unwrap();
        select(&mut floorplan, &[a]);

        assert_eq!(floorplan.resize_selected(Some(80), None), 1);
        assert_eq!(floorplan.resize_selected(None, Some(-5)), 0);
        assert_eq!(floorplan.objects().get(a).unwrap().size, (80, 40));
        assert_eq!(floorplan.objects().get(b).unwrap().size, (40, 40));
    }
}
