use eframe::egui::{self, RichText, Ui};

use crate::util::{format_meters, format_point};

use super::super::{ViewModel, layers};

const PREDICTION_ROWS: usize = 30;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Node");
        let focus_index = self
            .selected
            .as_deref()
            .and_then(|id| self.snapshot.network.node_index(id))
            .or(self.hovered);

        if let Some(node) = focus_index.and_then(|index| self.snapshot.network.nodes.get(index)) {
            ui.monospace(&node.id);
            ui.label(format!("kind: {}", node.kind.label()));
            ui.label(format!("position: {}", format_point(node.pos)));
            if let Some(elevation) = node.elevation {
                ui.label(format!("elevation: {elevation:.1} m"));
            }
            if self.snapshot.network.is_sensor(&node.id) {
                ui.label(RichText::new("pressure sensor").strong());
            }
        } else {
            ui.label("Hover or click a node on the map.");
        }

        ui.separator();
        ui.heading("Predictions");
        if self.snapshot.overlays.predictions.is_empty() {
            ui.label("No prediction snapshot loaded.");
        } else {
            let mut clicked = None;
            egui::ScrollArea::vertical()
                .id_salt("prediction_rows")
                .max_height(260.0)
                .show(ui, |ui| {
                    for prediction in self.snapshot.overlays.predictions.iter().take(PREDICTION_ROWS)
                    {
                        ui.horizontal(|ui| {
                            if ui.link(&prediction.detected_node).clicked() {
                                clicked = Some(prediction.detected_node.clone());
                            }
                            ui.label(format!("severity {:.2}", prediction.severity));
                        });
                        ui.label(
                            RichText::new(format!("since {}", prediction.estimated_start_time))
                                .weak(),
                        );
                        if let Some(work_order) = &prediction.work_order {
                            ui.label(RichText::new(format!("work order {work_order}")).weak());
                        }
                        ui.add_space(4.0);
                    }

                    if self.snapshot.overlays.predictions.len() > PREDICTION_ROWS {
                        ui.label(format!(
                            "... and {} more",
                            self.snapshot.overlays.predictions.len() - PREDICTION_ROWS
                        ));
                    }
                });
            if let Some(id) = clicked {
                self.set_selected(Some(id));
            }
        }

        ui.separator();
        ui.heading("Mains");
        let links = &self.snapshot.network.links;
        let total_length = links
            .iter()
            .filter_map(|link| link.length)
            .sum::<f64>();
        if total_length > 0.0 {
            ui.label(format!("total length: {}", format_meters(total_length as f32)));
        }
        let diameters = links
            .iter()
            .filter_map(|link| link.diameter)
            .collect::<Vec<_>>();
        if !diameters.is_empty() {
            let mean = diameters.iter().sum::<f64>() / diameters.len() as f64;
            ui.label(format!("mean diameter: {mean:.0} mm"));
        }

        ui.separator();
        ui.heading("Ground truth");
        match &self.snapshot.overlays.ground_truth {
            Some(truth) => {
                ui.label(format!("{} known leaks", truth.leaks.len()));
                if let Some(summary) = layers::error_summary(
                    &self.snapshot.network,
                    &self.snapshot.overlays.predictions,
                    self.snapshot.overlays.ground_truth.as_ref(),
                ) {
                    ui.label(format!(
                        "localization error: mean {}, max {} ({} pairs)",
                        format_meters(summary.mean),
                        format_meters(summary.max),
                        summary.pairs
                    ));
                }
            }
            None => {
                ui.label("No ground-truth snapshot loaded.");
            }
        }
    }
}
