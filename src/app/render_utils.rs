use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::net::NodeKind;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        color.a(),
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(16, 22, 28));
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

// Bounding-box test only; over-approximates for long diagonal segments,
// which just costs an occasional extra line draw.
pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

pub(super) fn node_style(kind: NodeKind) -> (f32, Color32) {
    match kind {
        NodeKind::Junction => (3.0, Color32::from_rgb(126, 144, 162)),
        NodeKind::Reservoir => (6.5, Color32::from_rgb(86, 156, 214)),
        NodeKind::Tank => (5.5, Color32::from_rgb(108, 178, 140)),
    }
}

pub(super) const PIPE_STROKE: Stroke = Stroke {
    width: 1.0,
    color: Color32::from_rgba_premultiplied(70, 82, 94, 200),
};

pub(super) const SENSOR_COLOR: Color32 = Color32::from_rgb(92, 186, 255);
pub(super) const TRUTH_COLOR: Color32 = Color32::from_rgb(235, 87, 87);
pub(super) const PREDICTION_COLOR: Color32 = Color32::from_rgb(255, 196, 61);
pub(super) const ERROR_LINE_COLOR: Color32 = Color32::from_rgba_premultiplied(170, 63, 63, 170);
pub(super) const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
pub(super) const SEARCH_MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
