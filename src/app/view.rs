use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{
    self, Align2, Color32, FontId, PointerButton, Rect, Sense, Shape, Stroke, Ui, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::net::NodeRecord;
use crate::util::format_point;

use super::hit::{GRID_CUTOFF, ScreenGrid};
use super::layers::{self, DrawPrimitive};
use super::project::{self, Bounds, Transform};
use super::render_utils::{
    ERROR_LINE_COLOR, HOVER_COLOR, PIPE_STROKE, PREDICTION_COLOR, SEARCH_MATCH_COLOR,
    SELECTED_COLOR, SENSOR_COLOR, TRUTH_COLOR, blend_color, circle_visible, dim_color,
    draw_background, node_style, segment_visible,
};
use super::{SearchMatchCache, ViewModel, ViewScratch, heat};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    pub(in crate::app) fn rebuild_layers(&mut self) {
        self.layer_cache = layers::build_layers(
            &self.snapshot.network,
            &self.snapshot.overlays.predictions,
            self.snapshot.overlays.ground_truth.as_ref(),
            self.flags,
            self.heat,
        );
        self.layers_dirty = false;
    }

    fn update_screen_space(
        rect: Rect,
        bounds: Bounds,
        transform: Transform,
        hit_radius: f32,
        nodes: &[NodeRecord],
        scratch: &mut ViewScratch,
    ) {
        scratch.screen_positions.clear();
        scratch.screen_positions.extend(
            nodes
                .iter()
                .map(|node| project::world_to_screen(node.pos, bounds, rect, transform)),
        );

        scratch.grid = (scratch.screen_positions.len() > GRID_CUTOFF)
            .then(|| ScreenGrid::build(&scratch.screen_positions, hit_radius));
    }

    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        if self.selected.is_some() {
            return None;
        }

        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .snapshot
            .network
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                fuzzy_match_score(&matcher, &node.id, query).map(|_score| index)
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_map(&mut self, ui: &mut Ui) {
        if self.layers_dirty {
            self.rebuild_layers();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect);

        self.handle_map_zoom(ui, &response);
        self.handle_map_pan(&response);

        let search_matches = self.cached_search_matches();
        let bounds = self.bounds;
        let transform = self.transform;

        Self::update_screen_space(
            rect,
            bounds,
            transform,
            self.hit_radius,
            &self.snapshot.network.nodes,
            &mut self.view_scratch,
        );
        self.update_hover(ui, rect);

        if self.hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let pending_selection = if response.clicked_by(PointerButton::Primary) {
            Some(self.hovered.and_then(|index| {
                self.snapshot
                    .network
                    .nodes
                    .get(index)
                    .map(|node| node.id.clone())
            }))
        } else {
            None
        };

        let selected_index = self
            .selected
            .as_deref()
            .and_then(|id| self.snapshot.network.node_index(id));
        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());
        let zoom_boost = transform.scale.powf(0.4);

        let mut visible_nodes = 0usize;
        let mut visible_links = 0usize;

        for primitive in &self.layer_cache {
            match primitive {
                DrawPrimitive::LinkBatch { segments } => {
                    for (start, end) in segments {
                        let start = project::world_to_screen(*start, bounds, rect, transform);
                        let end = project::world_to_screen(*end, bounds, rect, transform);
                        if !segment_visible(rect, start, end, 2.0) {
                            continue;
                        }
                        painter.line_segment([start, end], PIPE_STROKE);
                        visible_links += 1;
                    }
                }
                DrawPrimitive::Node { index, kind, .. } => {
                    let position = self.view_scratch.screen_positions[*index];
                    let (base_radius, base_color) = node_style(*kind);
                    let radius = (base_radius * zoom_boost).clamp(1.5, 18.0);
                    if !circle_visible(rect, position, radius + 4.0) {
                        continue;
                    }

                    let is_hovered = self.hovered == Some(*index);
                    let is_selected = selected_index == Some(*index);
                    let is_search_match = search_matches
                        .as_ref()
                        .is_some_and(|matches| matches.contains(index));

                    let color = if is_hovered {
                        HOVER_COLOR
                    } else if is_selected {
                        SELECTED_COLOR
                    } else if is_search_match {
                        blend_color(base_color, SEARCH_MATCH_COLOR, 0.68)
                    } else if search_active {
                        dim_color(base_color, 0.45)
                    } else {
                        base_color
                    };

                    painter.circle_filled(position, radius, color);
                    if is_selected {
                        painter.circle_stroke(
                            position,
                            radius + 3.0,
                            Stroke::new(1.6, SELECTED_COLOR),
                        );
                    }
                    visible_nodes += 1;
                }
                DrawPrimitive::Sensor { index, .. } => {
                    let position = self.view_scratch.screen_positions[*index];
                    let radius = (5.0 * zoom_boost).clamp(4.0, 16.0);
                    if !circle_visible(rect, position, radius + 3.0) {
                        continue;
                    }
                    painter.circle_stroke(position, radius, Stroke::new(1.8, SENSOR_COLOR));
                }
                DrawPrimitive::TruthMarker { pos } => {
                    let position = project::world_to_screen(*pos, bounds, rect, transform);
                    let half = 6.0;
                    if !circle_visible(rect, position, half + 2.0) {
                        continue;
                    }
                    let stroke = Stroke::new(2.0, TRUTH_COLOR);
                    painter.line_segment(
                        [position + vec2(-half, -half), position + vec2(half, half)],
                        stroke,
                    );
                    painter.line_segment(
                        [position + vec2(-half, half), position + vec2(half, -half)],
                        stroke,
                    );
                }
                DrawPrimitive::HeatPoint { pos, encoding } => {
                    let position = project::world_to_screen(*pos, bounds, rect, transform);
                    if !circle_visible(rect, position, encoding.radius) {
                        continue;
                    }
                    painter.circle_filled(
                        position,
                        encoding.radius,
                        heat::heat_color(encoding.color_position, encoding.opacity),
                    );
                }
                DrawPrimitive::PredictionMarker { pos, severity, .. } => {
                    let position = project::world_to_screen(*pos, bounds, rect, transform);
                    let radius = 4.5 + severity.clamp(0.0, 10.0) * 0.7;
                    if !circle_visible(rect, position, radius + 2.0) {
                        continue;
                    }
                    painter.circle_filled(position, radius, PREDICTION_COLOR);
                    painter.circle_stroke(
                        position,
                        radius,
                        Stroke::new(1.2, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
                    );
                }
                DrawPrimitive::ErrorLine { from, to } => {
                    let from = project::world_to_screen(*from, bounds, rect, transform);
                    let to = project::world_to_screen(*to, bounds, rect, transform);
                    if !segment_visible(rect, from, to, 2.0) {
                        continue;
                    }
                    painter.extend(Shape::dashed_line(
                        &[from, to],
                        Stroke::new(1.2, ERROR_LINE_COLOR),
                        6.0,
                        5.0,
                    ));
                }
            }
        }

        self.visible_node_count = visible_nodes;
        self.visible_link_count = visible_links;

        if self.snapshot.network.node_count() == 0 {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Network snapshot has no nodes",
                FontId::proportional(14.0),
                Color32::from_gray(180),
            );
        }

        if let Some(index) = self.hovered
            && let Some(node) = self.snapshot.network.nodes.get(index)
        {
            let mut panel_text = format!("{}  |  {}", node.id, node.kind.label());
            if let Some(elevation) = node.elevation {
                panel_text.push_str(&format!("  |  elev {elevation:.1} m"));
            }
            if self.snapshot.network.is_sensor(&node.id) {
                panel_text.push_str("  |  sensor");
            }
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if let Some(pointer) = ui.input(|input| input.pointer.hover_pos())
            && rect.contains(pointer)
        {
            let world = project::screen_to_world(pointer, bounds, rect, transform);
            painter.text(
                rect.left_bottom() + vec2(10.0, -10.0),
                Align2::LEFT_BOTTOM,
                format_point(world),
                FontId::proportional(12.0),
                Color32::from_gray(170),
            );
        }

        if let Some(selected) = pending_selection {
            self.apply_map_selection(selected);
        }
    }
}
