//! Painter-based renderer.
//!
//! Projects scene triangles through the camera, sorts them back to front and
//! hands them to egui as a single colored mesh. Grid lines are drawn first so
//! the model always sits on top of them.

use egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};
use nalgebra::{Matrix4, Vector3};

use super::camera::{Camera3D, Projected};
use super::scene::{MeshNode, Scene};

/// What the last frame drew
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: usize,
    pub culled: usize,
    pub grid_segments: usize,
}

struct ShadedTriangle {
    points: [Pos2; 3],
    depth: f32,
    color: Color32,
}

/// Draws a `Scene` onto an egui painter
#[derive(Debug)]
pub struct Renderer3D {
    size: Vec2,
    pixels_per_point: f32,
}

impl Renderer3D {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            pixels_per_point: 1.0,
        }
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_pixel_ratio(&mut self, pixels_per_point: f32) {
        self.pixels_per_point = pixels_per_point;
    }

    /// Render `scene` as seen by `camera` into `rect`
    pub fn render(&self, painter: &Painter, rect: Rect, scene: &Scene, camera: &Camera3D) -> FrameStats {
        painter.rect_filled(rect, 0.0, scene.background);

        let view_proj = camera.build_view_projection_matrix();
        let mut stats = FrameStats::default();

        for grid in scene.grids() {
            // Hairlines stay one physical pixel wide on high-dpi screens
            let width = 1.0 / self.pixels_per_point.max(1.0);
            for segment in grid.segments(&camera.eye) {
                if let Some((a, b)) = camera.project_segment(&view_proj, &segment.start, &segment.end) {
                    let color = grid.color.gamma_multiply(segment.alpha);
                    painter.line_segment([to_screen(rect, &a), to_screen(rect, &b)], Stroke::new(width, color));
                    stats.grid_segments += 1;
                }
            }
        }

        let (ambient, lights) = scene.lighting();
        let mut triangles = Vec::new();
        for node in scene.meshes() {
            collect_triangles(&mut triangles, &mut stats, node, camera, &view_proj, rect, ambient, &lights);
        }

        // Sort triangles by depth (back to front)
        triangles.sort_by(|a, b| b.depth.partial_cmp(&a.depth).unwrap_or(std::cmp::Ordering::Equal));

        let mut mesh = egui::Mesh::default();
        for tri in &triangles {
            let base = mesh.vertices.len() as u32;
            for p in tri.points {
                mesh.colored_vertex(p, tri.color);
            }
            mesh.add_triangle(base, base + 1, base + 2);
        }
        stats.triangles = triangles.len();
        painter.add(egui::Shape::mesh(mesh));

        stats
    }
}

#[allow(clippy::too_many_arguments)]
fn collect_triangles(
    out: &mut Vec<ShadedTriangle>,
    stats: &mut FrameStats,
    node: &MeshNode,
    camera: &Camera3D,
    view_proj: &Matrix4<f32>,
    rect: Rect,
    ambient: Vector3<f32>,
    lights: &[(Vector3<f32>, Vector3<f32>)],
) {
    let base_color = Vector3::new(node.color.r() as f32, node.color.g() as f32, node.color.b() as f32) / 255.0;

    for (corners, normal) in node.geometry.triangles() {
        let world = corners.map(|c| c + node.offset);
        let polygon = camera.project_polygon(view_proj, &world);
        if polygon.len() < 3 {
            continue;
        }
        let color = shade(base_color, &normal, ambient, lights);

        // Near-plane clipping can leave a quad; fan it from the first corner
        for i in 1..polygon.len() - 1 {
            let fan = [&polygon[0], &polygon[i], &polygon[i + 1]];
            let points = fan.map(|p| to_screen(rect, p));

            // Counter-clockwise in world space turns clockwise once y points down
            if signed_area(&points) >= 0.0 {
                stats.culled += 1;
                continue;
            }

            out.push(ShadedTriangle {
                points,
                depth: fan.iter().map(|p| p.depth).sum::<f32>() / 3.0,
                color,
            });
        }
    }
}

/// Lambert shading with the scene's ambient and directional lights
pub fn shade(base: Vector3<f32>, normal: &Vector3<f32>, ambient: Vector3<f32>, lights: &[(Vector3<f32>, Vector3<f32>)]) -> Color32 {
    let mut light = ambient;
    for (direction, color) in lights {
        light += color * normal.dot(direction).max(0.0);
    }
    let lit = base.component_mul(&light);
    Color32::from_rgb(channel(lit.x), channel(lit.y), channel(lit.z))
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn to_screen(rect: Rect, p: &Projected) -> Pos2 {
    Pos2::new(
        rect.center().x + p.ndc_x * rect.width() / 2.0,
        rect.center().y - p.ndc_y * rect.height() / 2.0,
    )
}

fn signed_area(points: &[Pos2; 3]) -> f32 {
    let [a, b, c] = points;
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mesh3D;
    use crate::viewer3d::scene::{MODEL_COLOR, setup_scene};
    use nalgebra::Point3;
    use std::sync::Arc;

    fn render_once(scene: &Scene, camera: &Camera3D) -> FrameStats {
        let ctx = egui::Context::default();
        let mut stats = FrameStats::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
            let renderer = Renderer3D::new(rect.size());
            stats = renderer.render(&painter, rect, scene, camera);
        });
        stats
    }

    #[test]
    fn test_sample_box_shows_three_faces() {
        let scene = setup_scene();
        let camera = Camera3D::new(800.0 / 600.0);
        let stats = render_once(&scene, &camera);
        // From (8, 8, 8) the +x, +y and +z faces are visible
        assert_eq!(stats.triangles, 6);
        assert_eq!(stats.culled, 6);
        assert!(stats.grid_segments > 0);
    }

    #[test]
    fn test_floor_reaching_behind_camera_is_clipped_not_dropped() {
        let mut floor = Mesh3D::new();
        floor.push_triangle(
            [
                Point3::new(-100.0, 0.0, 100.0),
                Point3::new(100.0, 0.0, 100.0),
                Point3::new(0.0, 0.0, -100.0),
            ],
            Vector3::y(),
        );
        let mut scene = setup_scene();
        scene.swap_model("floor", Arc::new(floor));

        let mut camera = Camera3D::new(800.0 / 600.0);
        camera.eye = Point3::new(0.0, 2.0, 0.0);
        camera.target = Point3::new(0.0, 0.0, -10.0);

        let stats = render_once(&scene, &camera);
        assert_eq!(stats.triangles, 1);
        assert_eq!(stats.culled, 0);
    }

    #[test]
    fn test_shade_lit_and_unlit_faces() {
        let scene = setup_scene();
        let (ambient, lights) = scene.lighting();
        let base = Vector3::new(0.0, 1.0, 0.0);
        let facing = shade(base, &Vector3::new(1.0, 1.0, 1.0).normalize(), ambient, &lights);
        let away = shade(base, &Vector3::new(-1.0, -1.0, -1.0).normalize(), ambient, &lights);
        assert_eq!(facing, MODEL_COLOR);
        assert_eq!(away, Color32::from_rgb(0, 128, 0));
    }

    #[test]
    fn test_to_screen_maps_ndc_corners() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(200.0, 100.0));
        let top_left = to_screen(rect, &Projected { ndc_x: -1.0, ndc_y: 1.0, depth: 1.0 });
        assert_eq!(top_left, Pos2::new(10.0, 20.0));
        let bottom_right = to_screen(rect, &Projected { ndc_x: 1.0, ndc_y: -1.0, depth: 1.0 });
        assert_eq!(bottom_right, Pos2::new(210.0, 120.0));
    }
}
