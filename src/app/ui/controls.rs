use eframe::egui::{self, Ui};

use super::super::ViewModel;

const SEARCH_RESULT_ROWS: usize = 12;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layers");
        let mut layers_changed = false;
        layers_changed |= ui
            .checkbox(&mut self.flags.show_sensors, "Sensors")
            .changed();
        layers_changed |= ui
            .checkbox(&mut self.flags.show_ground_truth, "Ground-truth leaks")
            .changed();
        layers_changed |= ui
            .checkbox(&mut self.flags.show_predictions, "Predictions")
            .changed();
        layers_changed |= ui
            .checkbox(&mut self.flags.show_heatmap, "Probability heatmap")
            .changed();
        layers_changed |= ui
            .checkbox(&mut self.flags.show_error_lines, "Prediction error lines")
            .changed();

        ui.separator();
        ui.heading("Heatmap encoding");
        layers_changed |= ui
            .add(
                egui::Slider::new(&mut self.heat.radius_scale, 4.0..=60.0)
                    .text("radius scale (px)"),
            )
            .changed();
        layers_changed |= ui
            .add(egui::Slider::new(&mut self.heat.radius_min, 0.5..=12.0).text("radius min (px)"))
            .changed();
        layers_changed |= ui
            .add(egui::Slider::new(&mut self.heat.opacity_scale, 0.05..=1.0).text("opacity scale"))
            .changed();

        if layers_changed {
            self.layers_dirty = true;
        }

        ui.separator();
        ui.heading("Interaction");
        ui.add(egui::Slider::new(&mut self.hit_radius, 4.0..=60.0).text("hover radius (px)"));
        ui.add(egui::Slider::new(&mut self.pan_sensitivity, 0.2..=3.0).text("pan sensitivity"));
        ui.horizontal(|ui| {
            if ui.button("Reset view").clicked() {
                self.reset_view();
            }
            ui.label(format!("zoom {:.2}x", self.transform.scale));
        });

        ui.separator();
        ui.heading("Find node");
        let search_response = ui.text_edit_singleline(&mut self.search);
        if search_response.changed() {
            self.search_match_cache = None;
        }

        if self.selected.is_some() {
            if ui.button("Clear selection").clicked() {
                self.set_selected(None);
            }
        } else if let Some(matches) = self.cached_search_matches() {
            let mut indices = matches.iter().copied().collect::<Vec<_>>();
            indices.sort_unstable();

            ui.label(format!("{} matching nodes", indices.len()));

            let mut clicked = None;
            for index in indices.into_iter().take(SEARCH_RESULT_ROWS) {
                let Some(node) = self.snapshot.network.nodes.get(index) else {
                    continue;
                };
                if ui.link(&node.id).clicked() {
                    clicked = Some(node.id.clone());
                }
            }
            if let Some(id) = clicked {
                self.set_selected(Some(id));
            }
        }
    }
}
