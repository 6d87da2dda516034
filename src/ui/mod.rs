//! User interface of the layout editor.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main FloorplanApp
//! - `file_ops` - File save/load operations for native and WASM
//! - `canvas` - Canvas navigation, zooming, panning and click selection
//! - `rendering` - Drawing the grid, the outline and the objects
//! - `tree_view` - The theme tree panel with drag and drop

mod canvas;
mod file_ops;
mod rendering;
mod state;
mod tree_view;

pub use state::FloorplanApp;

use self::state::PendingConfirmAction;
use crate::constants::{COPY_OFFSET, DEFAULT_OBJECT_SIZE};
use crate::types::LayoutObject;
use eframe::egui;
#[cfg(target_arch = "wasm32")]
use eframe::wasm_bindgen::JsCast;
use log::{debug, error};

impl eframe::App for FloorplanApp {
    /// Persist UI preferences between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => storage.set_string("app_state", json),
            Err(err) => error!("failed to serialize app state: {err}"),
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_pending_operations(ctx);
        self.handle_edit_shortcuts(ctx);
        self.handle_file_shortcuts(ctx);

        // Intercept native window close requests (titlebar X)
        #[cfg(not(target_arch = "wasm32"))]
        if ctx.input(|i| i.viewport().close_requested()) {
            if self.file.has_unsaved_changes && !self.file.allow_close_on_next_request {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                if !self.file.show_unsaved_dialog {
                    self.file.show_unsaved_dialog = true;
                    self.file.pending_confirm_action = Some(PendingConfirmAction::Quit);
                }
            } else {
                self.file.allow_close_on_next_request = false;
            }
        }

        #[cfg(target_arch = "wasm32")]
        Self::update_beforeunload(self.file.has_unsaved_changes);

        // Restore native window size once per session (desktop only)
        #[cfg(not(target_arch = "wasm32"))]
        {
            if !self.applied_viewport_restore {
                if let Some((w, h)) = self.window_inner_size {
                    ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(w, h)));
                }
                self.applied_viewport_restore = true;
            }
            let size = ctx.input(|i| i.screen_rect().size());
            self.window_inner_size = Some((size.x, size.y));
        }

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        let viewport_width = ctx.input(|i| i.screen_rect().width());
        let max_width = (viewport_width * 0.6).max(160.0);
        egui::SidePanel::left("tree_panel")
            .resizable(true)
            .default_width(self.tree_panel_width.clamp(160.0, max_width))
            .show(ctx, |ui| {
                self.tree_panel_width = ui.available_width().clamp(160.0, max_width);
                self.draw_tree_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        self.draw_unsaved_dialog(ctx);
    }
}

impl FloorplanApp {
    #[cfg(target_arch = "wasm32")]
    fn update_beforeunload(has_unsaved_changes: bool) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if !has_unsaved_changes {
            window.set_onbeforeunload(None);
            return;
        }
        let closure = eframe::wasm_bindgen::closure::Closure::wrap(Box::new(
            move |event: web_sys::Event| {
                event.prevent_default();
                let _ = js_sys::Reflect::set(
                    event.as_ref(),
                    &eframe::wasm_bindgen::JsValue::from_str("returnValue"),
                    &eframe::wasm_bindgen::JsValue::from_str("unsaved"),
                );
            },
        ) as Box<dyn FnMut(_)>);
        window.set_onbeforeunload(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }

    /// New, Open, Save and Save As on Cmd/Ctrl, plus Quit on native builds.
    fn handle_file_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (cmd, shift, save, open, new, quit) = ctx.input(|i| {
            (
                i.modifiers.command,
                i.modifiers.shift,
                i.key_pressed(egui::Key::S),
                i.key_pressed(egui::Key::O),
                i.key_pressed(egui::Key::N),
                i.key_pressed(egui::Key::Q),
            )
        });
        if !cmd {
            return;
        }
        if save && shift {
            self.save_as_floorplan();
        } else if save {
            self.save_floorplan();
        }
        if open {
            self.request_action(PendingConfirmAction::Open);
        }
        if new {
            self.request_action(PendingConfirmAction::New);
        }
        #[cfg(not(target_arch = "wasm32"))]
        if quit {
            if self.file.has_unsaved_changes {
                self.request_action(PendingConfirmAction::Quit);
            } else {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
        #[cfg(target_arch = "wasm32")]
        let _ = quit;
    }

    /// Delete removes the selected objects; Cmd/Ctrl+G makes a theme from them; Cmd/Ctrl+C
    /// duplicates them; A distributes them; the arrow keys move them, or the whole floorplan
    /// with Shift held.
    fn handle_edit_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let step = self.config.move_step;
        let (delete, group, copy, distribute, shift, delta) = ctx.input(|i| {
            let mut delta = (0, 0);
            if i.key_pressed(egui::Key::ArrowLeft) {
                delta.0 -= step;
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                delta.0 += step;
            }
            if i.key_pressed(egui::Key::ArrowUp) {
                delta.1 -= step;
            }
            if i.key_pressed(egui::Key::ArrowDown) {
                delta.1 += step;
            }
            (
                i.key_pressed(egui::Key::Delete),
                i.key_pressed(egui::Key::G) && i.modifiers.command,
                i.events.iter().any(|e| matches!(e, egui::Event::Copy)),
                i.key_pressed(egui::Key::A) && i.modifiers.is_none(),
                i.modifiers.shift,
                delta,
            )
        });
        if delete {
            self.delete_selected_objects();
        }
        if group {
            self.make_theme();
        }
        if copy {
            self.copy_selected_objects();
        }
        if distribute {
            self.align_selected_objects(true);
        }
        if delta != (0, 0) {
            self.move_objects(delta, shift);
        }
    }

    /// Adds an object of the chosen type at the centre of the visible canvas.
    pub fn add_object_of_selected_type(&mut self, canvas_center: egui::Pos2) {
        let world = self.screen_to_world(canvas_center);
        let (w, h) = DEFAULT_OBJECT_SIZE;
        let object = LayoutObject::new(
            self.selected_object_type.clone(),
            (world.x as i32 - w / 2, world.y as i32 - h / 2),
            (w, h),
        );
        match self.floorplan.add_object(object) {
            Some(id) => {
                self.floorplan.select_object(Some(id), false);
                self.file.has_unsaved_changes = true;
            }
            None => self.set_status("Object is below the minimum size"),
        }
    }

    /// Groups the selected objects into a new theme.
    pub fn make_theme(&mut self) {
        if self.floorplan.objects().selected().next().is_none() {
            self.set_status("Select objects to group first");
            return;
        }
        let theme = self.floorplan.make_theme();
        debug!("made theme {theme}");
        self.file.has_unsaved_changes = true;
    }

    /// Takes the selected tree node out of its theme, or dissolves the selected theme.
    pub fn remove_from_tree(&mut self) {
        if self.floorplan.tree().selected_node().is_none() {
            return;
        }
        self.floorplan.remove_tree_selection();
        self.file.has_unsaved_changes = true;
    }

    /// Deletes the selected objects from the floorplan.
    pub fn delete_selected_objects(&mut self) {
        if self.floorplan.remove_selected_objects() > 0 {
            self.file.has_unsaved_changes = true;
        }
    }

    /// Duplicates the selected objects next to the originals.
    pub fn copy_selected_objects(&mut self) {
        if !self.floorplan.copy_selected(COPY_OFFSET).is_empty() {
            self.file.has_unsaved_changes = true;
        }
    }

    /// Aligns the selected objects, spacing them evenly when `distribute` is set.
    pub fn align_selected_objects(&mut self, distribute: bool) {
        if self.floorplan.align_selected(distribute) {
            self.file.has_unsaved_changes = true;
        } else if distribute {
            self.set_status("Not enough room to distribute");
        } else {
            self.set_status("Select at least two objects to align");
        }
    }

    /// Scales the floorplan up by the configured ratio, or down by its inverse.
    pub fn scale_floorplan(&mut self, up: bool) {
        let ratio = self.config.scale_ratio;
        self.floorplan.global_scale(if up { ratio } else { ratio.recip() });
        self.file.has_unsaved_changes = true;
    }

    /// Moves the selected objects, or everything when `total` is set.
    pub fn move_objects(&mut self, delta: (i32, i32), total: bool) {
        if !total && self.floorplan.objects().selected().next().is_none() {
            return;
        }
        self.floorplan.multi_move(delta, total);
        self.file.has_unsaved_changes = true;
    }

    /// Gives the selected objects the remembered width or height.
    pub fn resize_selected_objects(&mut self, width: bool, height: bool) {
        let (w, h) = self.resize_to;
        let resized = self
            .floorplan
            .resize_selected(width.then_some(w), height.then_some(h));
        if resized > 0 {
            self.file.has_unsaved_changes = true;
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("New").clicked() {
                self.request_action(PendingConfirmAction::New);
            }
            if ui.button("Open").clicked() {
                self.request_action(PendingConfirmAction::Open);
            }
            if ui.button("Save").clicked() {
                self.save_floorplan();
            }
            if ui.button("Save As").clicked() {
                self.save_as_floorplan();
            }

            ui.separator();

            egui::ComboBox::from_id_salt("object_type_combo")
                .selected_text(self.selected_object_type.clone())
                .show_ui(ui, |ui| {
                    for info in &self.config.object_types {
                        ui.selectable_value(
                            &mut self.selected_object_type,
                            info.name.clone(),
                            info.name.as_str(),
                        );
                    }
                });
            if ui.button("Add object").clicked() {
                let center = ui.ctx().screen_rect().center();
                self.add_object_of_selected_type(center);
            }

            ui.separator();

            if ui.button("Make theme").clicked() {
                self.make_theme();
            }
            if ui.button("Remove from tree").clicked() {
                self.remove_from_tree();
            }
            if ui.button("Delete objects").clicked() {
                self.delete_selected_objects();
            }
            if ui.button("Copy").clicked() {
                self.copy_selected_objects();
            }

            ui.separator();

            if ui.button("Align").clicked() {
                self.align_selected_objects(false);
            }
            if ui.button("Distribute").clicked() {
                self.align_selected_objects(true);
            }
            if ui.button("Scale up").clicked() {
                self.scale_floorplan(true);
            }
            if ui.button("Scale down").clicked() {
                self.scale_floorplan(false);
            }
            ui.add(egui::DragValue::new(&mut self.resize_to.0).range(0..=10_000));
            if ui.button("Same width").clicked() {
                self.resize_selected_objects(true, false);
            }
            ui.add(egui::DragValue::new(&mut self.resize_to.1).range(0..=10_000));
            if ui.button("Same height").clicked() {
                self.resize_selected_objects(false, true);
            }

            ui.separator();

            ui.checkbox(&mut self.canvas.show_grid, "Show Grid");
            ui.checkbox(&mut self.dark_mode, "Dark Mode");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let name = self.file.current_path.as_deref().unwrap_or("Untitled");
                let marker = if self.file.has_unsaved_changes { "*" } else { "" };
                ui.label(format!("{name}{marker}"));
                ui.label(format!("Zoom: {:.0}%", self.canvas.zoom_factor * 100.0));
                if let Some(status) = &self.status {
                    ui.label(status);
                }
            });
        });
    }

    fn draw_unsaved_dialog(&mut self, ctx: &egui::Context) {
        if !self.file.show_unsaved_dialog {
            return;
        }
        let action = self.file.pending_confirm_action;
        let (title, confirm_label) = match action {
            Some(PendingConfirmAction::Quit) => ("Unsaved changes: quit?", "Discard and Quit"),
            Some(PendingConfirmAction::New) => ("Unsaved changes: new layout?", "Discard and Create New"),
            Some(PendingConfirmAction::Open) => ("Unsaved changes: open file?", "Discard and Open"),
            None => ("Unsaved changes", "Discard"),
        };
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("You have unsaved changes. Are you sure you want to continue?");
                ui.horizontal(|ui| {
                    if ui.button(confirm_label).clicked() {
                        if let Some(action) = action {
                            self.perform_confirmed_action(action, Some(ctx));
                        }
                        self.file.show_unsaved_dialog = false;
                        self.file.pending_confirm_action = None;
                    }
                    if ui.button("Cancel").clicked() {
                        self.file.show_unsaved_dialog = false;
                        self.file.pending_confirm_action = None;
                    }
                });
            });
    }
}
