//! Canvas interaction and navigation functionality.
//!
//! This module handles canvas panning, zooming, click selection of objects, and
//! coordinate transformations between screen and floorplan space.

use super::state::FloorplanApp;
use crate::constants::{MAX_ZOOM, MIN_ZOOM};
use eframe::egui;

impl FloorplanApp {
    /// Converts screen coordinates to floorplan coordinates accounting for zoom and pan.
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        (screen_pos - self.canvas.offset) / self.canvas.zoom_factor
    }

    /// Converts floorplan coordinates to screen coordinates accounting for zoom and pan.
    pub fn world_to_screen(&self, world_pos: egui::Pos2) -> egui::Pos2 {
        world_pos * self.canvas.zoom_factor + self.canvas.offset
    }

    /// Draws the floorplan and handles pointer input on it.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        // Leave a margin so the floorplan origin is not glued to the panel edge
        if !self.canvas.initialized {
            self.canvas.offset = response.rect.min.to_vec2() + egui::vec2(40.0, 40.0);
            self.canvas.initialized = true;
        }

        self.handle_canvas_panning(ui, &response);
        self.handle_canvas_zoom(ui, &response);
        self.handle_canvas_selection(ui, &response);

        self.render_floorplan(&painter, response.rect);
    }

    /// Handles middle-click or Cmd/Ctrl+left-click canvas panning.
    ///
    /// `modifiers.command` maps to Cmd on macOS and Ctrl elsewhere.
    pub fn handle_canvas_panning(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let should_pan = ui.input(|i| {
            i.pointer.middle_down() || (i.pointer.primary_down() && i.modifiers.command)
        });

        if should_pan {
            if let Some(current_pos) = response.interact_pointer_pos() {
                if !self.interaction.is_panning {
                    self.interaction.is_panning = true;
                    self.interaction.last_pan_pos = Some(current_pos);
                } else if let Some(last_pos) = self.interaction.last_pan_pos {
                    self.canvas.offset += current_pos - last_pos;
                    self.interaction.last_pan_pos = Some(current_pos);
                }
            }
        } else {
            self.interaction.is_panning = false;
            self.interaction.last_pan_pos = None;
        }
    }

    /// Zooms around the cursor on scroll, keeping the point under it fixed.
    pub fn handle_canvas_zoom(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta == 0.0 {
            return;
        }
        let Some(mouse_pos) = ui
            .input(|i| i.pointer.hover_pos())
            .or_else(|| response.interact_pointer_pos())
        else {
            return;
        };
        if !response.rect.contains(mouse_pos) {
            return;
        }

        let anchor = self.screen_to_world(mouse_pos);
        let step = if scroll_delta > 0.0 { 0.025 } else { -0.025 };
        let old_zoom = self.canvas.zoom_factor;
        self.canvas.zoom_factor = (old_zoom + step).clamp(MIN_ZOOM, MAX_ZOOM);

        if (self.canvas.zoom_factor - old_zoom).abs() > f32::EPSILON {
            let moved_to = self.world_to_screen(anchor);
            self.canvas.offset += mouse_pos - moved_to;
        }
    }

    /// Selects the object under a primary press; shift toggles it in the selection.
    ///
    /// Pressing empty space without shift clears the selection. The tree anchor is left
    /// alone so a theme can still be chosen as the parent for the next grouping.
    pub fn handle_canvas_selection(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let (pressed, press_pos, modifiers) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.press_origin(),
                i.modifiers,
            )
        });
        if !pressed || modifiers.command {
            return;
        }
        let Some(pos) = press_pos.filter(|p| response.rect.contains(*p)) else {
            return;
        };
        let world = self.screen_to_world(pos);
        let hit = self.floorplan.object_at((world.x, world.y));
        self.floorplan.select_object(hit, modifiers.shift);
    }
}
