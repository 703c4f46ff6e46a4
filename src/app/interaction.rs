use eframe::egui::{self, Rect, Ui};

use super::{ViewModel, hit};

impl ViewModel {
    pub(in crate::app) fn handle_map_zoom(&mut self, ui: &Ui, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        // Zoom is about the viewport center; panning re-centers afterwards.
        self.transform.zoom_step(scroll > 0.0);
    }

    pub(in crate::app) fn handle_map_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.transform.pan_by(response.drag_delta() * self.pan_sensitivity);
        }
    }

    pub(in crate::app) fn update_hover(&mut self, ui: &Ui, rect: Rect) {
        let pointer = ui.input(|input| input.pointer.hover_pos());

        self.hovered = pointer
            .filter(|position| rect.contains(*position))
            .and_then(|pointer| {
                let positions = &self.view_scratch.screen_positions;
                match &self.view_scratch.grid {
                    Some(grid) => grid.nearest_within(pointer, positions, self.hit_radius),
                    None => hit::nearest_within(pointer, positions, self.hit_radius),
                }
            });
    }

    pub(in crate::app) fn reset_view(&mut self) {
        self.transform.reset();
    }

    pub(in crate::app) fn apply_map_selection(&mut self, selected: Option<String>) {
        self.set_selected(selected);
    }
}
