//! Perspective camera for the model viewport.

use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Position the camera starts at before any model is loaded
pub const DEFAULT_HOME: [f32; 3] = [8.0, 8.0, 8.0];

/// 3D camera looking at `target`
#[derive(Clone, Debug)]
pub struct Camera3D {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub aspect: f32,
}

/// A point after projection: normalized device x/y plus its view depth
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub ndc_x: f32,
    pub ndc_y: f32,
    /// Distance along the view axis (clip-space `w`)
    pub depth: f32,
}

impl Camera3D {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Point3::from(DEFAULT_HOME),
            target: Point3::origin(),
            up: Vector3::y(),
            fovy: 75.0,
            znear: 0.1,
            zfar: 9000.0,
            aspect,
        }
    }

    /// Build the view-projection matrix
    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(&self.eye, &self.target, &self.up);
        let proj = Matrix4::new_perspective(self.aspect, self.fovy.to_radians(), self.znear, self.zfar);
        proj * view
    }

    /// Update the aspect ratio
    pub fn update_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn distance(&self) -> f32 {
        (self.eye - self.target).magnitude()
    }

    /// Camera basis as (right, up, forward)
    pub fn basis(&self) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>) {
        let forward = (self.target - self.eye).try_normalize(f32::EPSILON).unwrap_or(-Vector3::z());
        let right = forward.cross(&self.up).try_normalize(f32::EPSILON).unwrap_or(Vector3::x());
        let up = right.cross(&forward).normalize();
        (right, up, forward)
    }

    /// Project a world point. Points behind the near plane yield `None`.
    #[cfg(test)]
    pub fn project(&self, view_proj: &Matrix4<f32>, point: &Point3<f32>) -> Option<Projected> {
        let clip = view_proj * point.to_homogeneous();
        (clip.w >= self.znear).then(|| divide(&clip))
    }

    /// Project a segment, trimming the part that lies behind the near plane
    pub fn project_segment(
        &self,
        view_proj: &Matrix4<f32>,
        a: &Point3<f32>,
        b: &Point3<f32>,
    ) -> Option<(Projected, Projected)> {
        let mut ca = view_proj * a.to_homogeneous();
        let mut cb = view_proj * b.to_homogeneous();
        let near = self.znear;
        if ca.w < near && cb.w < near {
            return None;
        }
        if ca.w < near {
            let t = (near - ca.w) / (cb.w - ca.w);
            ca = ca.lerp(&cb, t);
        } else if cb.w < near {
            let t = (near - cb.w) / (ca.w - cb.w);
            cb = cb.lerp(&ca, t);
        }
        Some((divide(&ca), divide(&cb)))
    }

    /// Project a convex polygon, cutting away the part behind the near plane.
    /// Fewer than three points come back when too little is left in front.
    pub fn project_polygon(&self, view_proj: &Matrix4<f32>, points: &[Point3<f32>]) -> Vec<Projected> {
        let clip: Vec<Vector4<f32>> = points.iter().map(|p| view_proj * p.to_homogeneous()).collect();
        let near = self.znear;
        let mut kept = Vec::with_capacity(clip.len() + 1);
        for (i, current) in clip.iter().enumerate() {
            let next = &clip[(i + 1) % clip.len()];
            let (current_in, next_in) = (current.w >= near, next.w >= near);
            if current_in {
                kept.push(divide(current));
            }
            if current_in != next_in {
                let t = (near - current.w) / (next.w - current.w);
                let mut crossing = current.lerp(next, t);
                crossing.w = near;
                kept.push(divide(&crossing));
            }
        }
        kept
    }
}

/// Perspective divide of a clip-space point known to lie in front of the camera
fn divide(clip: &Vector4<f32>) -> Projected {
    Projected {
        ndc_x: clip.x / clip.w,
        ndc_y: clip.y / clip.w,
        depth: clip.w,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let camera = Camera3D::new(1.5);
        assert_eq!(camera.eye, Point3::new(8.0, 8.0, 8.0));
        assert_eq!(camera.target, Point3::origin());
        assert_eq!(camera.fovy, 75.0);
        assert_eq!(camera.znear, 0.1);
        assert_eq!(camera.zfar, 9000.0);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera3D::new(16.0 / 9.0);
        let vp = camera.build_view_projection_matrix();
        let p = camera.project(&vp, &camera.target).unwrap();
        assert!(p.ndc_x.abs() < 1e-5 && p.ndc_y.abs() < 1e-5);
        assert!((p.depth - camera.distance()).abs() < 1e-3);
    }

    #[test]
    fn test_points_behind_camera_are_rejected() {
        let camera = Camera3D::new(1.0);
        let vp = camera.build_view_projection_matrix();
        let behind = Point3::new(20.0, 20.0, 20.0);
        assert!(camera.project(&vp, &behind).is_none());
    }

    #[test]
    fn test_segment_is_trimmed_at_near_plane() {
        let camera = Camera3D::new(1.0);
        let vp = camera.build_view_projection_matrix();
        let (a, b) = camera
            .project_segment(&vp, &Point3::origin(), &Point3::new(20.0, 20.0, 20.0))
            .unwrap();
        assert!(a.depth > camera.znear);
        assert!((b.depth - camera.znear).abs() < 1e-3);
    }

    #[test]
    fn test_polygon_with_one_corner_behind_gains_a_corner() {
        let camera = Camera3D::new(1.0);
        let vp = camera.build_view_projection_matrix();
        let corners = [Point3::new(20.0, 20.0, 20.0), Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let polygon = camera.project_polygon(&vp, &corners);
        assert_eq!(polygon.len(), 4);
        assert!(polygon.iter().all(|p| p.depth >= camera.znear - 1e-4));
        assert_eq!(polygon[1], camera.project(&vp, &corners[1]).unwrap());
    }

    #[test]
    fn test_polygon_entirely_behind_is_empty() {
        let camera = Camera3D::new(1.0);
        let vp = camera.build_view_projection_matrix();
        let corners = [
            Point3::new(20.0, 20.0, 20.0),
            Point3::new(21.0, 20.0, 20.0),
            Point3::new(20.0, 21.0, 20.0),
        ];
        assert!(camera.project_polygon(&vp, &corners).is_empty());
    }

    #[test]
    fn test_update_aspect_ignores_empty_surface() {
        let mut camera = Camera3D::new(2.0);
        camera.update_aspect(0.0, 300.0);
        assert_eq!(camera.aspect, 2.0);
        camera.update_aspect(400.0, 200.0);
        assert_eq!(camera.aspect, 2.0);
        camera.update_aspect(300.0, 300.0);
        assert_eq!(camera.aspect, 1.0);
    }
}
