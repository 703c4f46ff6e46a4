use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2};

use crate::net::{self, OverlayData, Snapshot, SnapshotPaths};

mod heat;
mod hit;
mod interaction;
mod layers;
mod project;
mod render_utils;
mod ui;
mod view;

use heat::HeatOptions;
use hit::ScreenGrid;
use layers::{DrawPrimitive, LayerFlags};
use project::{Bounds, Transform};

pub struct LeakviewApp {
    paths: SnapshotPaths,
    state: AppState,
    reload_rx: Option<Receiver<Result<Snapshot, String>>>,
    overlay_rx: Option<Receiver<Result<OverlayData, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Snapshot, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    snapshot: Snapshot,
    bounds: Bounds,
    transform: Transform,
    flags: LayerFlags,
    heat: HeatOptions,
    hit_radius: f32,
    pan_sensitivity: f32,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    hovered: Option<usize>,
    selected: Option<String>,
    layers_dirty: bool,
    layer_cache: Vec<DrawPrimitive>,
    view_scratch: ViewScratch,
    visible_node_count: usize,
    visible_link_count: usize,
}

struct SearchMatchCache {
    query: String,
    matches: Arc<HashSet<usize>>,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Pos2>,
    grid: Option<ScreenGrid>,
}

impl LeakviewApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, paths: SnapshotPaths) -> Self {
        let state = Self::start_load(paths.clone());
        Self {
            paths,
            state,
            reload_rx: None,
            overlay_rx: None,
        }
    }

    fn spawn_snapshot_load(paths: SnapshotPaths) -> Receiver<Result<Snapshot, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = net::collect_snapshot(&paths).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn spawn_overlay_load(paths: SnapshotPaths) -> Receiver<Result<OverlayData, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = net::collect_overlays(&paths).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(paths: SnapshotPaths) -> AppState {
        AppState::Loading {
            rx: Self::spawn_snapshot_load(paths),
        }
    }
}

impl eframe::App for LeakviewApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(snapshot) => AppState::Ready(Box::new(ViewModel::new(snapshot))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading network snapshot...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load network snapshot");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.paths.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_network = false;
                let mut reload_overlays = false;
                let network_loading = self.reload_rx.is_some();
                let overlays_loading = self.overlay_rx.is_some();
                model.show(
                    ctx,
                    &self.paths,
                    &mut reload_network,
                    &mut reload_overlays,
                    network_loading,
                    overlays_loading,
                );

                if reload_network && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_snapshot_load(self.paths.clone()));
                }
                if reload_overlays && self.overlay_rx.is_none() && self.reload_rx.is_none() {
                    self.overlay_rx = Some(Self::spawn_overlay_load(self.paths.clone()));
                }

                // A full network reload replaces the view model (and with it
                // the pan/zoom state); an overlay refresh keeps both.
                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(snapshot) => {
                                    AppState::Ready(Box::new(ViewModel::new(snapshot)))
                                }
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }

                if let Some(rx) = self.overlay_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(overlays)) => {
                            model.apply_overlays(overlays);
                        }
                        Ok(Err(error)) => {
                            log::warn!("overlay refresh failed: {error}");
                        }
                        Err(TryRecvError::Empty) => {
                            self.overlay_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            log::warn!("overlay refresh worker disconnected");
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.overlay_rx = None;
            self.state = next_state;
        }
    }
}
