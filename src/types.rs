//! Core data types for the layout editor.
//!
//! Layout objects are the rectangles placed on the floorplan: cabinets, display boards,
//! walls and the like. The registry keeps them in insertion order, and that order is the
//! object index used by the saved grouping graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for layout objects.
pub type ObjectId = Uuid;

/// A rectangle on the floorplan with a type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutObject {
    /// Unique identifier for this object
    pub id: ObjectId,
    /// Display type, e.g. "display board"; picks the color and the grouping rules
    pub type_name: String,
    /// Top-left corner in floorplan units
    pub position: (i32, i32),
    /// Width and height in floorplan units
    pub size: (i32, i32),
    /// Whether the object is part of the current selection
    #[serde(skip)]
    pub is_selected: bool,
}

impl LayoutObject {
    /// Creates an unselected object with a fresh id.
    pub fn new(type_name: impl Into<String>, position: (i32, i32), size: (i32, i32)) -> Self {
        Self {
            id: Uuid::new_v4(),
            type_name: type_name.into(),
            position,
            size,
            is_selected: false,
        }
    }

    /// Returns true if `point` lies inside the object's rectangle.
    pub fn contains_point(&self, point: (f32, f32)) -> bool {
        let (x, y) = (self.position.0 as f32, self.position.1 as f32);
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);
        point.0 >= x && point.0 < x + w && point.1 >= y && point.1 < y + h
    }

    /// Returns true if both sides are shorter than `min_size`.
    pub fn is_too_small(&self, min_size: i32) -> bool {
        self.size.0 < min_size && self.size.1 < min_size
    }
}

/// Ordered collection of the floorplan's objects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectRegistry {
    objects: Vec<LayoutObject>,
}

impl ObjectRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an object and returns its id.
    pub fn add(&mut self, object: LayoutObject) -> ObjectId {
        let id = object.id;
        self.objects.push(object);
        id
    }

    /// Removes an object, returning it if it was present.
    pub fn remove(&mut self, id: ObjectId) -> Option<LayoutObject> {
        let index = self.index_of(id)?;
        Some(self.objects.remove(index))
    }

    /// Removes every selected object and returns their ids in registry order.
    pub fn remove_selected(&mut self) -> Vec<ObjectId> {
        let removed = self.selected().map(|o| o.id).collect();
        self.objects.retain(|o| !o.is_selected);
        removed
    }

    /// Looks up an object.
    pub fn get(&self, id: ObjectId) -> Option<&LayoutObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Looks up an object for editing.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut LayoutObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// All objects in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutObject> {
        self.objects.iter()
    }

    /// Mutable access to all objects in registry order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LayoutObject> {
        self.objects.iter_mut()
    }

    /// The selected objects in registry order.
    pub fn selected(&self) -> impl Iterator<Item = &LayoutObject> {
        self.objects.iter().filter(|o| o.is_selected)
    }

    /// Deselects every object.
    pub fn clear_selection(&mut self) {
        for object in &mut self.objects {
            object.is_selected = false;
        }
    }

    /// Ids in registry order. The position of an id is its index in saved documents.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id).collect()
    }

    /// Position of `id` in registry order.
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if there are no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Removes every object.
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_creation() {
        let object = LayoutObject::new("display board", (10, 20), (40, 30));

        assert_eq!(object.type_name, "display board");
        assert_eq!(object.position, (10, 20));
        assert_eq!(object.size, (40, 30));
        assert!(!object.is_selected);
        assert!(!object.id.is_nil());
    }

    #[test]
    fn test_contains_point_is_half_open() {
        let object = LayoutObject::new("entrance", (10, 20), (40, 30));

        assert!(object.contains_point((10.0, 20.0)));
        assert!(object.contains_point((49.9, 49.9)));
        assert!(!object.contains_point((50.0, 30.0)));
        assert!(!object.contains_point((30.0, 50.0)));
        assert!(!object.contains_point((9.0, 25.0)));
    }

    #[test]
    fn test_too_small_needs_both_sides_short() {
        assert!(LayoutObject::new("x", (0, 0), (5, 9)).is_too_small(10));
        assert!(!LayoutObject::new("x", (0, 0), (5, 10)).is_too_small(10));
        assert!(!LayoutObject::new("x", (0, 0), (100, 2)).is_too_small(10));
    }

    #[test]
    fn test_registry_keeps_insertion_order() {
        let mut registry = ObjectRegistry::new();
        let a = registry.add(LayoutObject::new("a", (0, 0), (10, 10)));
        let b = registry.add(LayoutObject::new("b", (0, 0), (10, 10)));
        let c = registry.add(LayoutObject::new("c", (0, 0), (10, 10)));

        assert_eq!(registry.ids(), vec![a, b, c]);
        assert_eq!(registry.index_of(c), Some(2));

        registry.remove(b);
        assert_eq!(registry.ids(), vec![a, c]);
        assert_eq!(registry.index_of(c), Some(1));
        assert_eq!(registry.remove(b), None);
    }

    #[test]
    fn test_registry_remove_selected() {
        let mut registry = ObjectRegistry::new();
        let a = registry.add(LayoutObject::new("a", (0, 0), (10, 10)));
        let b = registry.add(LayoutObject::new("b", (0, 0), (10, 10)));
        let c = registry.add(LayoutObject::new("c", (0, 0), (10, 10)));
        registry.get_mut(a).unwrap().is_selected = true;
        registry.get_mut(c).unwrap().is_selected = true;

        assert_eq!(registry.selected().count(), 2);
        assert_eq!(registry.remove_selected(), vec![a, c]);
        assert_eq!(registry.ids(), vec![b]);
    }

    #[test]
    fn test_registry_clear_selection() {
        let mut registry = ObjectRegistry::new();
        let a = registry.add(LayoutObject::new("a", (0, 0), (10, 10)));
        registry.get_mut(a).unwrap().is_selected = true;

        registry.clear_selection();

        assert_eq!(registry.selected().count(), 0);
        assert!(registry.get(a).is_some());
    }

    #[test]
    fn test_selection_flag_is_not_serialized() {
        let mut object = LayoutObject::new("display board", (1, 2), (3, 4));
        object.is_selected = true;

        let json = serde_json::to_string(&object).unwrap();
        let restored: LayoutObject = serde_json::from_str(&json).unwrap();

        assert!(!json.contains("is_selected"));
        assert!(!restored.is_selected);
        assert_eq!(restored.id, object.id);
    }
}
