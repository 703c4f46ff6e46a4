use eframe::egui::{Pos2, Rect, Vec2, vec2};

pub(in crate::app) const MIN_ZOOM: f32 = 0.1;
pub(in crate::app) const MAX_ZOOM: f32 = 10.0;

const ZOOM_IN_FACTOR: f32 = 1.1;
const ZOOM_OUT_FACTOR: f32 = 0.9;
const FIT_MARGIN: f32 = 0.85;
const BOUNDS_PAD_FRACTION: f32 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    pub(in crate::app) fn unit() -> Self {
        Self {
            min_x: 0.0,
            max_x: 1.0,
            min_y: 0.0,
            max_y: 1.0,
        }
    }

    pub(in crate::app) fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);

        for point in points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return Self::unit();
        }

        let pad_x = pad_for_span(max.x - min.x);
        let pad_y = pad_for_span(max.y - min.y);

        Self {
            min_x: min.x - pad_x,
            max_x: max.x + pad_x,
            min_y: min.y - pad_y,
            max_y: max.y + pad_y,
        }
    }

    pub(in crate::app) fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub(in crate::app) fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    pub(in crate::app) fn center(self) -> Vec2 {
        vec2(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }
}

fn pad_for_span(span: f32) -> f32 {
    if span > 0.0 {
        span * BOUNDS_PAD_FRACTION
    } else {
        1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Transform {
    pub offset: Vec2,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub(in crate::app) fn pan_by(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub(in crate::app) fn zoom_step(&mut self, zoom_in: bool) {
        let factor = if zoom_in {
            ZOOM_IN_FACTOR
        } else {
            ZOOM_OUT_FACTOR
        };
        self.scale = (self.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub(in crate::app) fn reset(&mut self) {
        *self = Self::default();
    }
}

fn fit_scale(bounds: Bounds, viewport: Rect) -> f32 {
    let scale_x = viewport.width() / bounds.width();
    let scale_y = viewport.height() / bounds.height();
    let scale = scale_x.min(scale_y) * FIT_MARGIN;

    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

// World Y grows upward, screen Y grows downward.
pub(in crate::app) fn world_to_screen(
    world: Vec2,
    bounds: Bounds,
    viewport: Rect,
    transform: Transform,
) -> Pos2 {
    let scale = fit_scale(bounds, viewport) * transform.scale;
    let world_center = bounds.center();
    let screen_center = viewport.center();

    Pos2::new(
        screen_center.x + (world.x - world_center.x) * scale + transform.offset.x,
        screen_center.y - (world.y - world_center.y) * scale + transform.offset.y,
    )
}

pub(in crate::app) fn screen_to_world(
    screen: Pos2,
    bounds: Bounds,
    viewport: Rect,
    transform: Transform,
) -> Vec2 {
    let scale = fit_scale(bounds, viewport) * transform.scale;
    let world_center = bounds.center();
    let screen_center = viewport.center();

    vec2(
        world_center.x + (screen.x - transform.offset.x - screen_center.x) / scale,
        world_center.y - (screen.y - transform.offset.y - screen_center.y) / scale,
    )
}
