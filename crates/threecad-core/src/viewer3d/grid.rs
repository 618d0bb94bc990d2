//! Infinite ground grid on the XZ plane.
//!
//! The grid follows the camera: lines are generated around the camera's
//! ground position and fade out with `(1 - d / distance)^3`. Minor lines are
//! drawn at half the opacity of major lines.

use egui::Color32;
use nalgebra::{Point2, Point3};

/// Pieces each grid line is cut into so the fade can vary along it
const SEGMENTS_PER_LINE: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteGrid {
    /// Minor line spacing
    pub minor: f32,
    /// Major line spacing
    pub major: f32,
    pub color: Color32,
    /// Radius at which the grid has faded out completely
    pub distance: f32,
}

/// A piece of grid line ready to project
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSegment {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
    pub alpha: f32,
}

impl InfiniteGrid {
    pub fn new(minor: f32, major: f32, color: Color32, distance: f32) -> Self {
        Self {
            minor,
            major,
            color,
            distance,
        }
    }

    /// Opacity at `dist` from the camera's ground position
    pub fn fade(&self, dist: f32) -> f32 {
        let d = 1.0 - (dist / self.distance).min(1.0);
        d * d * d
    }

    /// Generate the visible segments for a camera at `eye`
    pub fn segments(&self, eye: &Point3<f32>) -> Vec<GridSegment> {
        let center = Point2::new(eye.x, eye.z);
        let mut segments = Vec::new();

        // Minor lines vanish into a solid sheet far from the camera, so keep them close
        let minor_radius = (eye.y.abs() * 8.0).clamp(self.minor * 10.0, self.distance * 0.5);
        self.push_lines(&mut segments, center, self.minor, minor_radius, 0.5, Some(self.major));
        self.push_lines(&mut segments, center, self.major, self.distance, 1.0, None);

        segments
    }

    fn push_lines(
        &self,
        out: &mut Vec<GridSegment>,
        center: Point2<f32>,
        spacing: f32,
        radius: f32,
        opacity: f32,
        skip_multiples_of: Option<f32>,
    ) {
        if spacing <= 0.0 || radius <= 0.0 {
            return;
        }
        let first = ((center.x - radius) / spacing).ceil() as i64;
        let last = ((center.x + radius) / spacing).floor() as i64;
        let first_z = ((center.y - radius) / spacing).ceil() as i64;
        let last_z = ((center.y + radius) / spacing).floor() as i64;

        let is_skipped = |coord: f32| {
            skip_multiples_of
                .map(|m| m > 0.0 && (coord / m - (coord / m).round()).abs() < 1e-4)
                .unwrap_or(false)
        };

        // Lines parallel to Z
        for i in first..=last {
            let x = i as f32 * spacing;
            if is_skipped(x) {
                continue;
            }
            self.push_line(out, center, |t| Point3::new(x, 0.0, center.y - radius + t * 2.0 * radius), opacity);
        }
        // Lines parallel to X
        for i in first_z..=last_z {
            let z = i as f32 * spacing;
            if is_skipped(z) {
                continue;
            }
            self.push_line(out, center, |t| Point3::new(center.x - radius + t * 2.0 * radius, 0.0, z), opacity);
        }
    }

    fn push_line(
        &self,
        out: &mut Vec<GridSegment>,
        center: Point2<f32>,
        along: impl Fn(f32) -> Point3<f32>,
        opacity: f32,
    ) {
        for s in 0..SEGMENTS_PER_LINE {
            let start = along(s as f32 / SEGMENTS_PER_LINE as f32);
            let end = along((s + 1) as f32 / SEGMENTS_PER_LINE as f32);
            let mid = Point2::new((start.x + end.x) / 2.0, (start.z + end.z) / 2.0);
            let alpha = self.fade((mid - center).norm()) * opacity;
            if alpha > 0.0 {
                out.push(GridSegment { start, end, alpha });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> InfiniteGrid {
        InfiniteGrid::new(20.0, 500.0, Color32::from_rgb(0xc0, 0xc0, 0xc0), 3500.0)
    }

    #[test]
    fn test_fade_curve() {
        let grid = grid();
        assert_eq!(grid.fade(0.0), 1.0);
        assert!((grid.fade(1750.0) - 0.125).abs() < 1e-6);
        assert_eq!(grid.fade(3500.0), 0.0);
        assert_eq!(grid.fade(10_000.0), 0.0);
    }

    #[test]
    fn test_segments_lie_on_ground_plane() {
        let segments = grid().segments(&Point3::new(8.0, 8.0, 8.0));
        assert!(!segments.is_empty());
        assert!(segments.iter().all(|s| s.start.y == 0.0 && s.end.y == 0.0));
        assert!(segments.iter().all(|s| s.alpha > 0.0 && s.alpha <= 1.0));
    }

    #[test]
    fn test_grid_follows_camera() {
        let grid = grid();
        let eye = Point3::new(10_000.0, 5.0, -4_000.0);
        let segments = grid.segments(&eye);
        assert!(!segments.is_empty());
        let max_dist = segments
            .iter()
            .map(|s| (Point2::new(s.start.x, s.start.z) - Point2::new(eye.x, eye.z)).norm())
            .fold(0.0f32, f32::max);
        assert!(max_dist <= grid.distance * 2f32.sqrt() + 1.0);
    }

    #[test]
    fn test_minor_lines_are_dimmer_than_major() {
        let grid = grid();
        let segments = grid.segments(&Point3::new(0.0, 8.0, 0.0));
        // The x = 20 minor line and the x = 0 major line, nearest segment of each
        let near_alpha = |x: f32| {
            segments
                .iter()
                .filter(|s| s.start.x == x && s.end.x == x)
                .map(|s| s.alpha)
                .fold(0.0f32, f32::max)
        };
        assert!(near_alpha(20.0) < near_alpha(0.0));
    }
}
