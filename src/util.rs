use eframe::egui::Vec2;

pub fn format_meters(value: f32) -> String {
    if value >= 1000.0 {
        format!("{:.2} km", value / 1000.0)
    } else {
        format!("{value:.1} m")
    }
}

pub fn format_point(point: Vec2) -> String {
    format!("({:.1}, {:.1})", point.x, point.y)
}
