use eframe::egui::Color32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct HeatOptions {
    pub radius_scale: f32,
    pub radius_min: f32,
    pub opacity_scale: f32,
}

impl Default for HeatOptions {
    fn default() -> Self {
        Self {
            radius_scale: 26.0,
            radius_min: 3.0,
            opacity_scale: 0.55,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct HeatEncoding {
    pub radius: f32,
    pub opacity: f32,
    pub color_position: f32,
}

/// Linear weight-to-channel mapping; weights outside [0, 1] are clamped, so
/// even malformed samples stay a visible, bounded dot.
pub(in crate::app) fn encode(weight: f32, options: HeatOptions) -> HeatEncoding {
    let weight = if weight.is_finite() {
        weight.clamp(0.0, 1.0)
    } else {
        0.0
    };

    HeatEncoding {
        radius: weight * options.radius_scale + options.radius_min,
        opacity: weight * options.opacity_scale,
        color_position: weight,
    }
}

pub(in crate::app) fn heat_color(color_position: f32, opacity: f32) -> Color32 {
    let color = colorous::INFERNO.eval_continuous(color_position.clamp(0.0, 1.0) as f64);
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_monotonic_in_weight() {
        let options = HeatOptions::default();
        let mut previous = encode(0.0, options);
        for step in 1..=10 {
            let current = encode(step as f32 / 10.0, options);
            assert!(current.radius >= previous.radius);
            assert!(current.opacity >= previous.opacity);
            assert!(current.color_position >= previous.color_position);
            previous = current;
        }
    }

    #[test]
    fn near_zero_weight_keeps_minimum_radius() {
        let options = HeatOptions::default();
        assert_eq!(encode(0.0, options).radius, options.radius_min);
        assert!(encode(0.001, options).radius >= options.radius_min);
    }

    #[test]
    fn high_weight_encodes_strictly_larger_than_low_weight() {
        let options = HeatOptions::default();
        let low = encode(0.1, options);
        let high = encode(0.9, options);
        assert!(high.radius > low.radius);
        assert!(high.opacity > low.opacity);
    }

    #[test]
    fn out_of_range_weights_are_clamped() {
        let options = HeatOptions::default();
        assert_eq!(encode(-2.0, options), encode(0.0, options));
        assert_eq!(encode(3.5, options), encode(1.0, options));
        assert_eq!(encode(f32::NAN, options), encode(0.0, options));
    }

    #[test]
    fn heat_color_alpha_tracks_opacity() {
        assert_eq!(heat_color(0.5, 0.0).a(), 0);
        assert_eq!(heat_color(0.5, 1.0).a(), 255);
        assert_eq!(heat_color(0.5, 2.0).a(), 255);
    }
}
