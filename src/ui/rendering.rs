//! Canvas rendering for the grid, the floorplan outline and the layout objects.

use super::state::FloorplanApp;
use crate::constants::{
    GRID_SIZE, OBJECT_SELECTED_STROKE_WIDTH, OBJECT_STROKE_WIDTH, OUTLINE_STROKE_WIDTH,
};
use crate::types::LayoutObject;
use eframe::egui;
use eframe::epaint::StrokeKind;

impl FloorplanApp {
    /// Renders the floorplan in layers: grid, outline, then objects in registry order.
    pub fn render_floorplan(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        if self.canvas.show_grid {
            self.draw_grid(painter, canvas_rect);
        }
        self.draw_outline(painter);
        for object in self.floorplan.objects().iter() {
            self.draw_object(painter, object);
        }
    }

    /// Draws a zoom-aware grid on the canvas.
    ///
    /// Lines are skipped when they would sit closer than a few pixels apart.
    pub fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let spacing = GRID_SIZE * self.canvas.zoom_factor;
        if spacing < 4.0 {
            return;
        }
        let stroke = egui::Stroke::new(
            1.0,
            egui::Color32::from_rgba_unmultiplied(128, 128, 128, 32),
        );

        let top_left = self.screen_to_world(canvas_rect.min);
        let bottom_right = self.screen_to_world(canvas_rect.max);

        let mut x = (top_left.x / GRID_SIZE).floor() * GRID_SIZE;
        while x <= bottom_right.x {
            let sx = self.world_to_screen(egui::pos2(x, 0.0)).x;
            painter.line_segment(
                [
                    egui::pos2(sx, canvas_rect.min.y),
                    egui::pos2(sx, canvas_rect.max.y),
                ],
                stroke,
            );
            x += GRID_SIZE;
        }
        let mut y = (top_left.y / GRID_SIZE).floor() * GRID_SIZE;
        while y <= bottom_right.y {
            let sy = self.world_to_screen(egui::pos2(0.0, y)).y;
            painter.line_segment(
                [
                    egui::pos2(canvas_rect.min.x, sy),
                    egui::pos2(canvas_rect.max.x, sy),
                ],
                stroke,
            );
            y += GRID_SIZE;
        }
    }

    /// Draws the outline as a closed polygon.
    pub fn draw_outline(&self, painter: &egui::Painter) {
        if self.floorplan.outline.len() < 2 {
            return;
        }
        let points: Vec<egui::Pos2> = self
            .floorplan
            .outline
            .iter()
            .map(|(x, y)| self.world_to_screen(egui::pos2(*x as f32, *y as f32)))
            .collect();
        let color = if self.dark_mode {
            egui::Color32::from_gray(200)
        } else {
            egui::Color32::from_gray(40)
        };
        painter.add(egui::Shape::closed_line(
            points,
            egui::Stroke::new(OUTLINE_STROKE_WIDTH, color),
        ));
    }

    /// Draws one object as a filled rectangle labelled with its type.
    pub fn draw_object(&self, painter: &egui::Painter, object: &LayoutObject) {
        let min = self.world_to_screen(egui::pos2(
            object.position.0 as f32,
            object.position.1 as f32,
        ));
        let size = egui::vec2(object.size.0 as f32, object.size.1 as f32) * self.canvas.zoom_factor;
        let rect = egui::Rect::from_min_size(min, size);

        let fill = self.config.color_for(&object.type_name);
        painter.rect_filled(rect, 0.0, fill.gamma_multiply(0.8));

        let (width, color) = if object.is_selected {
            (
                OBJECT_SELECTED_STROKE_WIDTH,
                egui::Color32::from_rgb(100, 150, 255),
            )
        } else {
            (OBJECT_STROKE_WIDTH, egui::Color32::from_gray(60))
        };
        painter.rect_stroke(
            rect,
            0.0,
            egui::Stroke::new(width, color),
            StrokeKind::Inside,
        );

        let font_size = (11.0 * self.canvas.zoom_factor).clamp(7.0, 20.0);
        if rect.height() > font_size && rect.width() > font_size * 2.0 {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                &object.type_name,
                egui::FontId::proportional(font_size),
                egui::Color32::BLACK,
            );
        }
    }
}
