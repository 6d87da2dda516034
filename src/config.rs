//! Editor configuration file.
//!
//! The configuration is a JSON file next to the working directory. On first start the
//! defaults are written out so they can be edited by hand.

use crate::constants::{
    MOVE_STEP, OBJECT_MIN_SIZE, SCALE_RATIO, TREE_GAP_SIZE, TREE_NODE_HEIGHT, TREE_NODE_WIDTH,
    TREE_SELECTED_LINE_WIDTH, TREE_SEPARATOR_THICKNESS, TREE_TAB_SIZE,
};
use crate::grouping::LayoutMetrics;
use egui::Color32;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name of the configuration.
pub const CONFIG_FILE_NAME: &str = "layout_editor.json";

/// Environment variable that overrides the configuration path.
pub const CONFIG_PATH_ENV: &str = "LAYOUT_EDITOR_CONFIG";

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("failed to access config file {path}: {source}")]
    Io {
        /// The config file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for the settings
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// The config file
        path: PathBuf,
        /// Parser error with line and column
        #[source]
        source: serde_json::Error,
    },
}

/// A placeable object type and its fill color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTypeInfo {
    /// Type name written into documents
    pub name: String,
    /// Fill color, either `#rrggbb` or a basic color name
    pub color: String,
}

impl ObjectTypeInfo {
    fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// Tunable settings of the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Row height of the tree view
    pub graph_node_height: i32,
    /// Row box width of the tree view
    pub graph_node_width: i32,
    /// Gap between the tree and the free list
    pub graph_edit_gap_size: i32,
    /// Indent per nesting level in the tree view
    pub graph_edit_tab_size: i32,
    /// Outline width of the selected tree row
    pub graph_area_selected_line_width: f32,
    /// Fill color of theme rows
    pub theme_node_color: String,
    /// Objects smaller than this in both dimensions are rejected
    pub object_min_size: i32,
    /// Object palette
    pub object_types: Vec<ObjectTypeInfo>,
    /// Types that are never moved into a theme
    pub ungroupable_types: Vec<String>,
    /// Units moved per arrow key press
    pub move_step: i32,
    /// Factor of one scale step
    pub scale_ratio: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            graph_node_height: TREE_NODE_HEIGHT,
            graph_node_width: TREE_NODE_WIDTH,
            graph_edit_gap_size: TREE_GAP_SIZE,
            graph_edit_tab_size: TREE_TAB_SIZE,
            graph_area_selected_line_width: TREE_SELECTED_LINE_WIDTH,
            theme_node_color: "pink".to_string(),
            object_min_size: OBJECT_MIN_SIZE,
            object_types: vec![
                ObjectTypeInfo::new("standalone cabinet", "orange"),
                ObjectTypeInfo::new("table cabinet", "#ff7b7b"),
                ObjectTypeInfo::new("display board", "yellow"),
                ObjectTypeInfo::new("wall cabinet", "#7de3ff"),
                ObjectTypeInfo::new("support wall", "gray"),
                ObjectTypeInfo::new("entrance", "#90ff49"),
            ],
            ungroupable_types: vec!["support wall".to_string()],
            move_step: MOVE_STEP,
            scale_ratio: SCALE_RATIO,
        }
    }
}

impl EditorConfig {
    /// Reads the configuration at `path`, writing the defaults there if it does not exist.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            info!("wrote default configuration to {}", path.display());
            return Ok(config);
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`load_or_init`](Self::load_or_init), but falls back to the defaults on error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load_or_init(path).unwrap_or_else(|e| {
            warn!("{e}; using default configuration");
            Self::default()
        })
    }

    /// Writes the configuration as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_error)
    }

    /// Where the configuration lives: `$LAYOUT_EDITOR_CONFIG`, else the default file name.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Tree view metrics described by this configuration.
    pub fn layout_metrics(&self) -> LayoutMetrics {
        LayoutMetrics {
            row_height: self.graph_node_height,
            indent: self.graph_edit_tab_size,
            gap: self.graph_edit_gap_size,
            separator_thickness: TREE_SEPARATOR_THICKNESS,
        }
    }

    /// Names of the configured object types, in palette order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.object_types.iter().map(|t| t.name.as_str())
    }

    /// Fill color of `type_name`; gray for unknown types.
    pub fn color_for(&self, type_name: &str) -> Color32 {
        self.object_types
            .iter()
            .find(|t| t.name == type_name)
            .and_then(|t| parse_color(&t.color))
            .unwrap_or(Color32::GRAY)
    }

    /// Fill color of theme rows.
    pub fn theme_color(&self) -> Color32 {
        parse_color(&self.theme_node_color).unwrap_or(Color32::LIGHT_RED)
    }
}

/// Parses `#rrggbb` or one of a few basic color names.
pub fn parse_color(value: &str) -> Option<Color32> {
    let value = value.trim();
    if value.starts_with('#') {
        return Color32::from_hex(value).ok();
    }
    let color = match value.to_ascii_lowercase().as_str() {
        "black" => Color32::BLACK,
        "white" => Color32::WHITE,
        "gray" | "grey" => Color32::GRAY,
        "red" => Color32::RED,
        "green" => Color32::GREEN,
        "blue" => Color32::BLUE,
        "yellow" => Color32::YELLOW,
        "orange" => Color32::from_rgb(255, 165, 0),
        "pink" => Color32::from_rgb(255, 192, 203),
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_or_init_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = EditorConfig::load_or_init(&path).unwrap();

        assert_eq!(config, EditorConfig::default());
        assert!(path.exists());
        let reread = EditorConfig::load_or_init(&path).unwrap();
        assert_eq!(reread, config);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "graph_node_height": 40, "ungroupable_types": [] }"#).unwrap();

        let config = EditorConfig::load_or_init(&path).unwrap();

        assert_eq!(config.graph_node_height, 40);
        assert!(config.ungroupable_types.is_empty());
        assert_eq!(config.object_min_size, OBJECT_MIN_SIZE);
        assert_eq!(config.layout_metrics().row_height, 40);
        assert_eq!(config.move_step, 1);
        assert_eq!(config.scale_ratio, 1.1);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let err = EditorConfig::load_or_init(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        assert_eq!(EditorConfig::load_or_default(&path), EditorConfig::default());
    }

    #[test]
    fn test_default_metrics_match_tree_defaults() {
        assert_eq!(EditorConfig::default().layout_metrics(), LayoutMetrics::default());
    }

    #[test]
    fn test_colors() {
        let config = EditorConfig::default();
        assert_eq!(config.color_for("table cabinet"), Color32::from_rgb(0xff, 0x7b, 0x7b));
        assert_eq!(config.color_for("display board"), Color32::YELLOW);
        assert_eq!(config.color_for("no such type"), Color32::GRAY);
        assert_eq!(config.theme_color(), Color32::from_rgb(255, 192, 203));
        assert_eq!(parse_color("not a color"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn test_type_names_in_palette_order() {
        let config = EditorConfig::default();
        let names: Vec<&str> = config.type_names().collect();
        assert_eq!(names.first(), Some(&"standalone cabinet"));
        assert_eq!(names.len(), 6);
    }
}
