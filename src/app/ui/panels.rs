use eframe::egui::{self, Align, Context, Layout};

use crate::net::{OverlayData, Snapshot, SnapshotPaths};

use super::super::project::{Bounds, Transform};
use super::super::{HeatOptions, LayerFlags, ViewModel, ViewScratch, hit};

impl ViewModel {
    pub(in crate::app) fn new(snapshot: Snapshot) -> Self {
        let bounds = Bounds::from_points(snapshot.network.nodes.iter().map(|node| node.pos));

        Self {
            snapshot,
            bounds,
            transform: Transform::default(),
            flags: LayerFlags::default(),
            heat: HeatOptions::default(),
            hit_radius: hit::DEFAULT_HIT_RADIUS,
            pan_sensitivity: 1.0,
            search: String::new(),
            search_match_cache: None,
            hovered: None,
            selected: None,
            layers_dirty: true,
            layer_cache: Vec::new(),
            view_scratch: ViewScratch::default(),
            visible_node_count: 0,
            visible_link_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        paths: &SnapshotPaths,
        reload_network: &mut bool,
        reload_overlays: &mut bool,
        network_loading: bool,
        overlays_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("leakview");
                    ui.separator();
                    ui.label(format!("network: {}", paths.network));
                    ui.label(format!("nodes: {}", self.snapshot.network.node_count()));
                    ui.label(format!("links: {}", self.snapshot.network.link_count()));
                    ui.label(format!("sensors: {}", self.snapshot.network.sensor_count()));
                    ui.label(format!(
                        "predictions: {}",
                        self.snapshot.overlays.predictions.len()
                    ));

                    let busy = network_loading || overlays_loading;
                    let reload_overlay_button = ui.add_enabled(
                        !busy && (paths.predictions.is_some() || paths.ground_truth.is_some()),
                        egui::Button::new("Refresh overlays"),
                    );
                    if reload_overlay_button.clicked() {
                        *reload_overlays = true;
                    }

                    let reload_network_button =
                        ui.add_enabled(!busy, egui::Button::new("Reload network"));
                    if reload_network_button.clicked() {
                        *reload_network = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "visible: {} nodes / {} links",
                            self.visible_node_count, self.visible_link_count
                        ));
                        if overlays_loading {
                            ui.spinner();
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if network_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading network snapshot...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_map(ui);
            }
        });
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected != selected {
            self.selected = selected;
        }
    }

    pub(in crate::app) fn apply_overlays(&mut self, overlays: OverlayData) {
        self.snapshot.overlays = overlays;
        self.layers_dirty = true;
    }
}
