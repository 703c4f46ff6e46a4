use std::collections::HashMap;

use eframe::egui::Pos2;

pub(in crate::app) const DEFAULT_HIT_RADIUS: f32 = 20.0;

// Above this many nodes the per-frame grid pays for itself.
pub(in crate::app) const GRID_CUTOFF: usize = 2048;

/// Nearest projected node strictly within `threshold` pixels of the pointer.
/// Exact ties keep the lowest index, so repeated queries are deterministic.
pub(in crate::app) fn nearest_within(
    pointer: Pos2,
    screen_positions: &[Pos2],
    threshold: f32,
) -> Option<usize> {
    let mut best: Option<(f32, usize)> = None;

    for (index, position) in screen_positions.iter().enumerate() {
        let distance_sq = position.distance_sq(pointer);
        if best.is_none_or(|(best_sq, _)| distance_sq < best_sq) {
            best = Some((distance_sq, index));
        }
    }

    best.filter(|(distance_sq, _)| distance_sq.sqrt() < threshold)
        .map(|(_, index)| index)
}

pub(in crate::app) struct ScreenGrid {
    cell: f32,
    buckets: HashMap<(i32, i32), Vec<usize>>,
}

impl ScreenGrid {
    pub(in crate::app) fn build(screen_positions: &[Pos2], cell: f32) -> Self {
        let cell = cell.max(1.0);
        let mut buckets: HashMap<(i32, i32), Vec<usize>> = HashMap::new();

        for (index, position) in screen_positions.iter().enumerate() {
            buckets
                .entry(Self::key(*position, cell))
                .or_default()
                .push(index);
        }

        Self { cell, buckets }
    }

    fn key(position: Pos2, cell: f32) -> (i32, i32) {
        ((position.x / cell).floor() as i32, (position.y / cell).floor() as i32)
    }

    /// Same contract as `nearest_within`; requires `threshold <= cell` so the
    /// 3x3 neighborhood around the pointer covers every candidate.
    pub(in crate::app) fn nearest_within(
        &self,
        pointer: Pos2,
        screen_positions: &[Pos2],
        threshold: f32,
    ) -> Option<usize> {
        let (cell_x, cell_y) = Self::key(pointer, self.cell);
        let mut best: Option<(f32, usize)> = None;

        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = self.buckets.get(&(cell_x + dx, cell_y + dy)) else {
                    continue;
                };

                for &index in bucket {
                    let distance_sq = screen_positions[index].distance_sq(pointer);
                    let closer = best.is_none_or(|(best_sq, best_index)| {
                        distance_sq < best_sq
                            || (distance_sq == best_sq && index < best_index)
                    });
                    if closer {
                        best = Some((distance_sq, index));
                    }
                }
            }
        }

        best.filter(|(distance_sq, _)| distance_sq.sqrt() < threshold)
            .map(|(_, index)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn returns_nearest_node_under_threshold() {
        let positions = [pos2(100.0, 100.0), pos2(110.0, 100.0), pos2(400.0, 400.0)];
        assert_eq!(nearest_within(pos2(104.0, 101.0), &positions, 20.0), Some(0));
        assert_eq!(nearest_within(pos2(108.0, 101.0), &positions, 20.0), Some(1));
    }

    #[test]
    fn misses_when_every_node_is_beyond_threshold() {
        let positions = [pos2(100.0, 100.0), pos2(200.0, 200.0)];
        assert_eq!(nearest_within(pos2(150.0, 150.0), &positions, 20.0), None);
    }

    #[test]
    fn threshold_is_strict() {
        let positions = [pos2(100.0, 100.0)];
        assert_eq!(nearest_within(pos2(120.0, 100.0), &positions, 20.0), None);
        assert_eq!(nearest_within(pos2(119.9, 100.0), &positions, 20.0), Some(0));
    }

    #[test]
    fn exact_tie_keeps_first_index() {
        let positions = [pos2(90.0, 100.0), pos2(110.0, 100.0)];
        assert_eq!(nearest_within(pos2(100.0, 100.0), &positions, 20.0), Some(0));
    }

    #[test]
    fn empty_positions_return_none() {
        assert_eq!(nearest_within(pos2(0.0, 0.0), &[], 20.0), None);
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let positions = (0..64)
            .map(|i| pos2((i % 8) as f32 * 30.0, (i / 8) as f32 * 30.0))
            .collect::<Vec<_>>();
        let pointer = pos2(47.0, 76.0);

        let first = nearest_within(pointer, &positions, 20.0);
        for _ in 0..10 {
            assert_eq!(nearest_within(pointer, &positions, 20.0), first);
        }
    }

    #[test]
    fn grid_agrees_with_linear_scan() {
        // Deterministic scatter across a few grid cells, including exact
        // cell-boundary positions.
        let mut positions = Vec::new();
        for i in 0..300usize {
            let x = ((i * 73) % 997) as f32;
            let y = ((i * 131) % 613) as f32;
            positions.push(pos2(x, y));
        }
        positions.push(pos2(40.0, 40.0));
        positions.push(pos2(60.0, 60.0));

        let threshold = 20.0;
        let grid = ScreenGrid::build(&positions, threshold);

        for i in 0..200usize {
            let pointer = pos2(((i * 37) % 1000) as f32, ((i * 53) % 620) as f32);
            assert_eq!(
                grid.nearest_within(pointer, &positions, threshold),
                nearest_within(pointer, &positions, threshold),
                "pointer {pointer:?}"
            );
        }
    }

    #[test]
    fn hit_test_through_projection_finds_node_under_cursor() {
        use super::super::project::{self, Bounds, Transform};
        use eframe::egui::{Rect, vec2};

        let world = [vec2(0.0, 0.0), vec2(10.0, 10.0)];
        let bounds = Bounds::from_points(world);
        let viewport = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        let transform = Transform::default();

        let positions = world
            .iter()
            .map(|point| project::world_to_screen(*point, bounds, viewport, transform))
            .collect::<Vec<_>>();

        assert_eq!(nearest_within(positions[1], &positions, 20.0), Some(1));
        assert_eq!(nearest_within(pos2(1.0, 1.0), &positions, 20.0), None);
    }

    #[test]
    fn grid_handles_negative_coordinates() {
        let positions = [pos2(-35.0, -12.0), pos2(14.0, 3.0)];
        let grid = ScreenGrid::build(&positions, 20.0);
        assert_eq!(grid.nearest_within(pos2(-30.0, -10.0), &positions, 20.0), Some(0));
        assert_eq!(grid.nearest_within(pos2(10.0, 0.0), &positions, 20.0), Some(1));
    }
}
