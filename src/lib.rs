//! # Exhibition Layout Editor
//!
//! An editor for exhibition floorplans: layout objects (cabinets, display boards, walls,
//! entrances) placed inside an outline polygon, grouped into a tree of nested themes.
//!
//! ## Features
//! - A grouping tree with one root theme, nested themes and a list of ungrouped objects
//! - Drag and drop re-parenting in the tree view, hit-tested against computed row spans
//! - JSON documents storing the grouping as an edge list over object indices
//! - Canvas panning, zooming and click selection
//! - A JSON settings file for tree metrics, object types and colors

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod grouping;
pub mod types;
mod ui;

pub use config::EditorConfig;
pub use document::{Floorplan, LayoutDocument, ObjectRecord};
pub use error::{Corruption, DocumentError, LayoutError};
pub use grouping::{GraphEdge, GroupingTree, NodeId, Placement};
pub use types::{LayoutObject, ObjectId, ObjectRegistry};
pub use ui::FloorplanApp;

/// Runs the layout editor window.
///
/// Settings come from [`EditorConfig::config_path`]; a missing file is created with the
/// defaults. UI preferences from the previous session are restored from eframe storage.
///
/// # Returns
///
/// Returns `Ok(())` when the window is closed, or an `eframe::Error` if initialization
/// fails.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), eframe::Error> {
///     exhibit_layout::run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> Result<(), eframe::Error> {
    let config = EditorConfig::load_or_default(&EditorConfig::config_path());
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Exhibition Layout Editor",
        options,
        Box::new(move |cc| {
            let mut app = cc
                .storage
                .and_then(|storage| storage.get_string("app_state"))
                .and_then(|json| match FloorplanApp::from_json(&json) {
                    Ok(app) => Some(app),
                    Err(err) => {
                        log::warn!("discarding stored app state: {err}");
                        None
                    }
                })
                .unwrap_or_default();
            app.apply_config(config);
            Ok(Box::new(app))
        }),
    )
}
