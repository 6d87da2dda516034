//! Application state management structures.
//!
//! This module contains the state structures that track the editor's UI: canvas
//! navigation, pointer interactions on the canvas and the tree view, and file operations.
//! Only preferences are persisted; the floorplan itself lives in documents.

use crate::config::EditorConfig;
use crate::constants::DEFAULT_OBJECT_SIZE;
use crate::document::Floorplan;
use crate::grouping::NodeId;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// State related to canvas navigation and display.
///
/// Tracks the current pan offset, zoom level, and display options for the canvas.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasState {
    /// Current canvas pan offset for navigation (in screen space)
    #[serde(skip)]
    pub offset: egui::Vec2,
    /// Current zoom level (1.0 = one floorplan unit per point)
    pub zoom_factor: f32,
    /// Whether the grid should be displayed on the canvas
    pub show_grid: bool,
    /// Set once the canvas has been centred on its first frame
    #[serde(skip)]
    pub initialized: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom_factor: 1.0,
            show_grid: true,
            initialized: false,
        }
    }
}

/// Pointer interaction state for the canvas and the tree view.
#[derive(Default)]
pub struct InteractionState {
    /// Whether the user is currently panning the canvas
    pub is_panning: bool,
    /// Last mouse position during panning operation
    pub last_pan_pos: Option<egui::Pos2>,
    /// Tree row pressed and possibly being dragged
    pub tree_drag_node: Option<NodeId>,
    /// Pointer position while a tree row is dragged, for the floating preview
    pub tree_drag_pos: Option<egui::Pos2>,
}

/// Where the floorplan was last saved, whether it changed since, and the plumbing for
/// dialogs that finish on another task.
pub struct FileState {
    /// File the floorplan was last saved to or opened from
    pub current_path: Option<String>,
    /// Set by every edit, cleared by a successful save or load
    pub has_unsaved_changes: bool,
    /// Save requested this frame, started on the next pass of the pending queue
    pub pending_save_operation: Option<PendingSaveOperation>,
    /// Open requested this frame
    pub pending_load_operation: Option<PendingLoadOperation>,
    /// Handed to dialog tasks so they can report back
    pub file_operation_sender: Option<Sender<FileOperationResult>>,
    /// Receiving end of the file operation channel
    pub file_operation_receiver: Option<Receiver<FileOperationResult>>,
    /// The discard-changes dialog is open
    pub show_unsaved_dialog: bool,
    /// What the dialog will do if confirmed
    pub pending_confirm_action: Option<PendingConfirmAction>,
    /// Lets exactly one window close request through after Quit was confirmed
    pub allow_close_on_next_request: bool,
}

impl Default for FileState {
    fn default() -> Self {
        let (tx, rx) = channel();
        Self {
            file_operation_sender: Some(tx),
            file_operation_receiver: Some(rx),
            current_path: None,
            has_unsaved_changes: false,
            show_unsaved_dialog: false,
            allow_close_on_next_request: false,
            pending_save_operation: None,
            pending_load_operation: None,
            pending_confirm_action: None,
        }
    }
}

/// Which save the toolbar or a shortcut asked for.
#[derive(Debug)]
pub enum PendingSaveOperation {
    /// Ask for a path first
    SaveAs,
    /// Overwrite `current_path`
    Save,
}

/// A requested open.
#[derive(Debug)]
pub enum PendingLoadOperation {
    /// Pick a layout file and load it
    Load,
}

/// Outcome of a dialog task, drained on the UI thread.
#[derive(Debug)]
pub enum FileOperationResult {
    /// Written to this path
    SaveCompleted(String),
    /// Path and the text read from it
    LoadCompleted(String, String),
    /// Human-readable failure
    OperationFailed(String),
}

/// Actions that would discard unsaved edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirmAction {
    /// Start an empty floorplan
    New,
    /// Replace the floorplan with a file
    Open,
    /// Close the window
    Quit,
}

/// The main application structure: the floorplan under edit plus UI state.
///
/// Implements `eframe::App`. Serialization covers the UI preferences only.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct FloorplanApp {
    /// The floorplan being edited
    #[serde(skip)]
    pub floorplan: Floorplan,
    /// Settings loaded from the configuration file
    #[serde(skip)]
    pub config: EditorConfig,
    /// Canvas navigation and display state
    pub canvas: CanvasState,
    /// Pointer interaction state
    #[serde(skip)]
    pub interaction: InteractionState,
    /// File operations state
    #[serde(skip)]
    pub file: FileState,
    /// Object type used by the "Add object" button
    pub selected_object_type: String,
    /// Width and height used by "Same width" and "Same height"
    pub resize_to: (i32, i32),
    /// Last status or error message shown in the toolbar
    #[serde(skip)]
    pub status: Option<String>,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Remembered width of the tree panel across sessions
    pub tree_panel_width: f32,
    /// Persisted last known window inner size in logical points (desktop only)
    pub window_inner_size: Option<(f32, f32)>,
    /// Whether we've already applied the stored window geometry this session
    #[serde(skip)]
    pub applied_viewport_restore: bool,
}

impl Default for FloorplanApp {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl FloorplanApp {
    /// Creates an app with an empty floorplan set up from `config`.
    pub fn new(config: EditorConfig) -> Self {
        let selected_object_type = config.type_names().next().unwrap_or_default().to_string();
        Self {
            floorplan: Floorplan::new(&config),
            config,
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            file: FileState::default(),
            selected_object_type,
            resize_to: DEFAULT_OBJECT_SIZE,
            status: None,
            dark_mode: true,
            tree_panel_width: 260.0,
            window_inner_size: None,
            applied_viewport_restore: false,
        }
    }

    /// Installs a new configuration and applies it to the floorplan.
    pub fn apply_config(&mut self, config: EditorConfig) {
        if !config.type_names().any(|t| t == self.selected_object_type) {
            self.selected_object_type = config.type_names().next().unwrap_or_default().to_string();
        }
        self.floorplan.apply_config(&config);
        self.config = config;
    }

    /// Serializes the persisted preferences to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Restores persisted preferences from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Records a user-visible status message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }
}
