//! Triangle mesh representation for decoded models.
//!
//! `Mesh3D` is what the STL decoder produces and what the scene wraps in a
//! shaded mesh node. Geometry is shared between the model library and the
//! scene through `Arc`, so swapping models never copies vertex data.

use nalgebra::{Point3, Vector3};

/// 3D mesh representation for rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh3D {
    pub vertices: Vec<Point3<f32>>,
    /// Three indices per triangle into `vertices`
    pub indices: Vec<u32>,
    /// One normal per triangle
    pub normals: Vec<Vector3<f32>>,
}

impl Mesh3D {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a triangle. A zero-length `normal` is replaced by the winding normal.
    pub fn push_triangle(&mut self, corners: [Point3<f32>; 3], normal: Vector3<f32>) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
        self.normals.push(resolve_normal(&corners, normal));
    }

    /// Axis-aligned box built from the eight corners of a `width × height × depth` cuboid centered on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
        let corner = |x: f32, y: f32, z: f32| Point3::new(x * hx, y * hy, z * hz);
        // Each face as two counter-clockwise triangles seen from outside
        let faces: [([Point3<f32>; 4], Vector3<f32>); 6] = [
            ([corner(1.0, -1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, 1.0, 1.0), corner(1.0, -1.0, 1.0)], Vector3::x()),
            ([corner(-1.0, -1.0, 1.0), corner(-1.0, 1.0, 1.0), corner(-1.0, 1.0, -1.0), corner(-1.0, -1.0, -1.0)], -Vector3::x()),
            ([corner(-1.0, 1.0, -1.0), corner(-1.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), corner(1.0, 1.0, -1.0)], Vector3::y()),
            ([corner(-1.0, -1.0, 1.0), corner(-1.0, -1.0, -1.0), corner(1.0, -1.0, -1.0), corner(1.0, -1.0, 1.0)], -Vector3::y()),
            ([corner(-1.0, -1.0, 1.0), corner(1.0, -1.0, 1.0), corner(1.0, 1.0, 1.0), corner(-1.0, 1.0, 1.0)], Vector3::z()),
            ([corner(1.0, -1.0, -1.0), corner(-1.0, -1.0, -1.0), corner(-1.0, 1.0, -1.0), corner(1.0, 1.0, -1.0)], -Vector3::z()),
        ];

        let mut mesh = Self::new();
        for (quad, normal) in faces {
            mesh.push_triangle([quad[0], quad[1], quad[2]], normal);
            mesh.push_triangle([quad[0], quad[2], quad[3]], normal);
        }
        mesh
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate triangles as corner positions plus the face normal
    pub fn triangles(&self) -> impl Iterator<Item = ([Point3<f32>; 3], Vector3<f32>)> + '_ {
        self.indices
            .chunks_exact(3)
            .zip(self.normals.iter())
            .map(|(tri, normal)| {
                (
                    [
                        self.vertices[tri[0] as usize],
                        self.vertices[tri[1] as usize],
                        self.vertices[tri[2] as usize],
                    ],
                    *normal,
                )
            })
    }

    /// Calculate axis-aligned bounding box
    pub fn bounding_box(&self) -> Option<BoundingBox3> {
        BoundingBox3::from_points(&self.vertices)
    }

    /// Get mesh statistics
    pub fn stats(&self) -> MeshStats {
        MeshStats {
            vertex_count: self.vertices.len(),
            triangle_count: self.triangle_count(),
        }
    }
}

fn resolve_normal(corners: &[Point3<f32>; 3], normal: Vector3<f32>) -> Vector3<f32> {
    if normal.norm_squared() > f32::EPSILON {
        return normal.normalize();
    }
    let winding = (corners[1] - corners[0]).cross(&(corners[2] - corners[0]));
    if winding.norm_squared() > f32::EPSILON {
        winding.normalize()
    } else {
        Vector3::zeros()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub triangle_count: usize,
}

/// Smallest axis-aligned box enclosing a set of points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox3 {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox3 {
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f32>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let mut bbox = Self { min: first, max: first };
        for p in points {
            bbox.min = bbox.min.inf(p);
            bbox.max = bbox.max.sup(p);
        }
        Some(bbox)
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f32 {
        self.size().max()
    }

    pub fn translated(&self, offset: &Vector3<f32>) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_of_cuboid() {
        let mesh = Mesh3D::cuboid(4.0, 2.0, 6.0);
        let bbox = mesh.bounding_box().unwrap();
        assert_eq!(bbox.min, Point3::new(-2.0, -1.0, -3.0));
        assert_eq!(bbox.max, Point3::new(2.0, 1.0, 3.0));
        assert_eq!(bbox.max_dimension(), 6.0);
        assert_eq!(bbox.center(), Point3::origin());
    }

    #[test]
    fn test_cuboid_stats() {
        let mesh = Mesh3D::cuboid(1.0, 1.0, 1.0);
        let stats = mesh.stats();
        assert_eq!(stats.triangle_count, 12);
        assert_eq!(stats.vertex_count, 36);
        assert_eq!(mesh.normals.len(), 12);
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let mesh = Mesh3D::cuboid(2.0, 2.0, 2.0);
        for (corners, normal) in mesh.triangles() {
            let centroid = (corners[0].coords + corners[1].coords + corners[2].coords) / 3.0;
            assert!(centroid.dot(&normal) > 0.0);
            let winding = (corners[1] - corners[0]).cross(&(corners[2] - corners[0]));
            assert!(winding.dot(&normal) > 0.0, "winding disagrees with normal {normal:?}");
        }
    }

    #[test]
    fn test_zero_normal_is_derived_from_winding() {
        let mut mesh = Mesh3D::new();
        mesh.push_triangle(
            [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
            Vector3::zeros(),
        );
        assert_eq!(mesh.normals[0], Vector3::z());
    }

    #[test]
    fn test_empty_mesh_has_no_bounding_box() {
        assert!(Mesh3D::new().bounding_box().is_none());
        assert!(Mesh3D::new().is_empty());
    }

    #[test]
    fn test_translated_box_moves_center() {
        let bbox = BoundingBox3 {
            min: Point3::new(0.0, 0.0, 0.0),
            max: Point3::new(2.0, 4.0, 6.0),
        };
        let moved = bbox.translated(&-bbox.center().coords);
        assert_eq!(moved.center(), Point3::origin());
        assert_eq!(moved.size(), bbox.size());
    }
}
