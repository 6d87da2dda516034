//! Shared application-wide constants.
//! Default sizes for the tree view and the floorplan canvas.

// Tree view
/// Height of one row in the grouping tree view (pixels).
pub const TREE_NODE_HEIGHT: i32 = 25;
/// Width of a row's box in the grouping tree view (pixels).
pub const TREE_NODE_WIDTH: i32 = 50;
/// Horizontal indent per nesting level (pixels).
pub const TREE_TAB_SIZE: i32 = 25;
/// Space between the root subtree and the separator (pixels).
pub const TREE_GAP_SIZE: i32 = 30;
/// Height of the separator line above the free list (pixels).
pub const TREE_SEPARATOR_THICKNESS: i32 = 2;
/// Outline width of the selected row (pixels).
pub const TREE_SELECTED_LINE_WIDTH: f32 = 4.0;

// Objects
/// Objects smaller than this in both dimensions are not added.
pub const OBJECT_MIN_SIZE: i32 = 10;
/// Size given to objects created from the toolbar.
pub const DEFAULT_OBJECT_SIZE: (i32, i32) = (80, 50);
/// How far copies land from their originals.
pub const COPY_OFFSET: (i32, i32) = (30, 30);
/// Side of the square area copies are kept inside.
pub const PAINT_AREA_SIZE: i32 = 1024;
/// Units moved per arrow key press.
pub const MOVE_STEP: i32 = 1;
/// Factor of one scale-up step; scaling down divides by it.
pub const SCALE_RATIO: f32 = 1.1;

// Canvas
/// Stroke width of the floorplan outline (in screen pixels).
pub const OUTLINE_STROKE_WIDTH: f32 = 2.0;
/// Stroke width of object rectangles (in screen pixels).
pub const OBJECT_STROKE_WIDTH: f32 = 1.5;
/// Stroke width of a selected object's rectangle (in screen pixels).
pub const OBJECT_SELECTED_STROKE_WIDTH: f32 = 3.0;
/// Grid cell size in floorplan units.
pub const GRID_SIZE: f32 = 20.0;
/// Pointer travel in screen points before a tree press counts as a drag.
pub const CLICK_THRESHOLD: f32 = 10.0;
/// Lower zoom limit for the canvas.
pub const MIN_ZOOM: f32 = 0.1;
/// Upper zoom limit for the canvas.
pub const MAX_ZOOM: f32 = 5.0;
