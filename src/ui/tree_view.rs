//! The theme tree panel.
//!
//! Rows are painted straight from the spans of the grouping tree's last layout pass, so
//! what the user sees is exactly what a drop is hit-tested against. Pressing a row selects
//! it; dragging it and letting go re-parents it.

use super::state::FloorplanApp;
use crate::constants::CLICK_THRESHOLD;
use crate::grouping::{LayoutNode, NodeKind, Placement};
use eframe::egui;
use eframe::epaint::StrokeKind;
use log::debug;

impl FloorplanApp {
    /// Draws the tree panel contents: a heading and the scrollable tree view.
    pub fn draw_tree_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Themes");
        ui.label(format!(
            "{} objects, {} ungrouped",
            self.floorplan.objects().len(),
            self.floorplan.tree().free_nodes().len()
        ));
        ui.separator();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| self.draw_tree_view(ui));
    }

    /// Allocates the tree area, handles pointer input on it and paints the rows.
    pub fn draw_tree_view(&mut self, ui: &mut egui::Ui) {
        let height = self.floorplan.tree().area_height().max(0) as f32;
        let width = ui
            .available_width()
            .max(self.config.graph_node_width as f32);
        let (response, painter) =
            ui.allocate_painter(egui::vec2(width, height), egui::Sense::click_and_drag());

        self.handle_tree_pointer(ui, &response);
        self.paint_tree(&painter, response.rect);
        self.paint_drag_preview(ui.ctx());
    }

    fn handle_tree_pointer(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let origin_y = response.rect.min.y;
        let (pressed, released, down, press_origin, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.press_origin(),
                i.pointer.interact_pos(),
            )
        });

        if pressed {
            if let Some(pos) = press_origin.filter(|p| response.rect.contains(*p)) {
                self.press_tree_row((pos.y - origin_y) as i32);
            }
        }
        // The preview only appears once the pointer has travelled past the click threshold
        if down && self.interaction.tree_drag_node.is_some() {
            let travelled = match (press_origin, pointer) {
                (Some(origin), Some(pos)) => origin.distance(pos) > CLICK_THRESHOLD,
                _ => false,
            };
            if travelled || self.interaction.tree_drag_pos.is_some() {
                self.interaction.tree_drag_pos = pointer;
            }
        }
        if released && self.interaction.tree_drag_node.is_some() {
            match pointer {
                Some(pos) => {
                    self.release_tree_row((pos.y - origin_y) as i32);
                }
                None => {
                    self.interaction.tree_drag_node = None;
                    self.interaction.tree_drag_pos = None;
                }
            }
        }
    }

    /// Selects the row at `y` (tree-view pixels) and arms it for dragging.
    ///
    /// Pressing outside every row clears the selection. The root can be selected but not
    /// dragged.
    pub fn press_tree_row(&mut self, y: i32) {
        let node = self.floorplan.tree().row_at(y);
        self.floorplan.select_tree_node(node);
        self.interaction.tree_drag_node = node.filter(|id| *id != self.floorplan.tree().root());
        self.interaction.tree_drag_pos = None;
    }

    /// Drops the armed row at `y`.
    ///
    /// Letting go over the row's own extent is a plain click and changes nothing.
    pub fn release_tree_row(&mut self, y: i32) -> Option<Placement> {
        self.interaction.tree_drag_pos = None;
        let node = self.interaction.tree_drag_node.take()?;
        let placement = self.floorplan.tree_mut().drag_node(node, y)?;
        debug!("tree row {node} moved to {placement:?}");
        self.file.has_unsaved_changes = true;
        Some(placement)
    }

    fn row_rect(&self, node: &LayoutNode, area: egui::Rect) -> egui::Rect {
        let metrics = self.floorplan.tree().metrics();
        let left = area.min.x + metrics.indent_for(node.depth) as f32;
        let width = (area.max.x - left).max(self.config.graph_node_width as f32);
        egui::Rect::from_min_size(
            egui::pos2(left, area.min.y + node.header.start as f32),
            egui::vec2(width, node.header.height() as f32),
        )
        .shrink2(egui::vec2(2.0, 1.0))
    }

    fn row_style(&self, node: &LayoutNode) -> (egui::Color32, String) {
        let tree = self.floorplan.tree();
        match &node.kind {
            NodeKind::Group(group) if node.id == tree.root() => (
                self.config.theme_color().gamma_multiply(0.6),
                format!("Exhibition ({})", group.len()),
            ),
            NodeKind::Group(group) => (
                self.config.theme_color(),
                format!("Theme ({})", group.len()),
            ),
            NodeKind::Leaf { object } => match self.floorplan.objects().get(*object) {
                Some(object) => (
                    self.config.color_for(&object.type_name),
                    object.type_name.clone(),
                ),
                None => (egui::Color32::GRAY, "?".to_string()),
            },
        }
    }

    fn paint_tree(&self, painter: &egui::Painter, area: egui::Rect) {
        let tree = self.floorplan.tree();
        let selected = tree.selected_node();
        let rows = tree
            .preorder(tree.root())
            .into_iter()
            .chain(tree.free_nodes().iter().copied());

        for id in rows {
            let Some(node) = tree.node(id) else {
                continue;
            };
            let rect = self.row_rect(node, area);
            let (fill, label) = self.row_style(node);
            let dragged = self.interaction.tree_drag_pos.is_some()
                && self.interaction.tree_drag_node == Some(id);
            let fill = if dragged { fill.gamma_multiply(0.3) } else { fill };

            painter.rect_filled(rect, 3.0, fill);
            let stroke = if selected == Some(id) {
                egui::Stroke::new(
                    self.config.graph_area_selected_line_width,
                    egui::Color32::from_rgb(100, 150, 255),
                )
            } else {
                egui::Stroke::new(1.0, egui::Color32::from_gray(70))
            };
            painter.rect_stroke(rect, 3.0, stroke, StrokeKind::Inside);
            painter.text(
                rect.left_center() + egui::vec2(6.0, 0.0),
                egui::Align2::LEFT_CENTER,
                label,
                egui::FontId::proportional(12.0),
                egui::Color32::BLACK,
            );
        }

        let separator = tree.layout_summary().separator;
        let line_y = area.min.y + (separator.start + separator.end) as f32 / 2.0;
        let color = if self.dark_mode {
            egui::Color32::from_gray(160)
        } else {
            egui::Color32::from_gray(80)
        };
        painter.line_segment(
            [
                egui::pos2(area.min.x, line_y),
                egui::pos2(area.max.x, line_y),
            ],
            egui::Stroke::new(separator.height().max(1) as f32, color),
        );
    }

    fn paint_drag_preview(&self, ctx: &egui::Context) {
        let (Some(id), Some(pos)) = (
            self.interaction.tree_drag_node,
            self.interaction.tree_drag_pos,
        ) else {
            return;
        };
        let Some(node) = self.floorplan.tree().node(id) else {
            return;
        };
        let (fill, label) = self.row_style(node);
        let size = egui::vec2(
            self.config.graph_node_width.max(120) as f32,
            node.header.height() as f32,
        );
        let rect = egui::Rect::from_center_size(pos, size);

        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Tooltip,
            egui::Id::new("tree_drag_preview"),
        ));
        painter.rect_filled(rect, 3.0, fill.gamma_multiply(0.7));
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            label,
            egui::FontId::proportional(12.0),
            egui::Color32::BLACK,
        );
    }
}
