//! STL decoding through `stl_io`.
//!
//! Both ASCII and binary STL are accepted; `stl_io` detects the flavour.
//! The indexed mesh it returns is flattened back into a triangle soup so
//! every facet keeps its own normal for flat shading.

use std::io::Cursor;

use nalgebra::{Point3, Vector3};

use super::error::ModelLoadError;
use super::mesh::Mesh3D;

/// Extension of the only model format the viewer understands
pub const STL_EXTENSION: &str = ".stl";

/// True when `name` ends in `.stl`, ignoring case
pub fn is_supported_file(name: &str) -> bool {
    name.to_lowercase().ends_with(STL_EXTENSION)
}

/// Decode raw STL bytes into a mesh. A file without facets is an error.
pub fn decode_stl(bytes: &[u8]) -> Result<Mesh3D, ModelLoadError> {
    let mut reader = Cursor::new(bytes);
    let indexed = stl_io::read_stl(&mut reader).map_err(|e| ModelLoadError::Decode(e.to_string()))?;

    let mut mesh = Mesh3D::new();
    mesh.vertices.reserve(indexed.faces.len() * 3);
    for face in &indexed.faces {
        let mut corners = [Point3::origin(); 3];
        for (corner, &index) in corners.iter_mut().zip(face.vertices.iter()) {
            let v = indexed
                .vertices
                .get(index)
                .ok_or_else(|| ModelLoadError::Decode(format!("facet references missing vertex {}", index)))?;
            *corner = Point3::new(v[0], v[1], v[2]);
        }
        let normal = Vector3::new(face.normal[0], face.normal[1], face.normal[2]);
        mesh.push_triangle(corners, normal);
    }

    if mesh.is_empty() {
        return Err(ModelLoadError::EmptyMesh);
    }
    Ok(mesh)
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A single right triangle in the XY plane, ASCII flavour
    pub const ASCII_TRIANGLE: &str = "solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid tri
";

    /// Binary STL bytes for the given triangles (normals left zeroed)
    pub fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
        let mut out = Vec::with_capacity(84 + triangles.len() * 50);
        out.extend_from_slice(&[0u8; 80]);
        out.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for tri in triangles {
            for _ in 0..3 {
                out.extend_from_slice(&0f32.to_le_bytes());
            }
            for corner in tri {
                for c in corner {
                    out.extend_from_slice(&c.to_le_bytes());
                }
            }
            out.extend_from_slice(&0u16.to_le_bytes());
        }
        out
    }

    /// Binary STL for an axis-aligned box spanning `min..max` (two opposite faces only)
    pub fn binary_box_faces(min: [f32; 3], max: [f32; 3]) -> Vec<u8> {
        binary_stl(&[
            [[min[0], min[1], min[2]], [max[0], min[1], min[2]], [max[0], max[1], min[2]]],
            [[min[0], min[1], max[2]], [max[0], max[1], max[2]], [min[0], max[1], max[2]]],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_supported_extension_is_case_insensitive() {
        assert!(is_supported_file("part.stl"));
        assert!(is_supported_file("PART.STL"));
        assert!(!is_supported_file("part.obj"));
        assert!(!is_supported_file("part.stl.zip"));
        assert!(!is_supported_file("stl"));
    }

    #[test]
    fn test_decode_ascii_triangle() {
        let mesh = decode_stl(ASCII_TRIANGLE.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        let bbox = mesh.bounding_box().unwrap();
        assert_eq!(bbox.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bbox.max, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.normals[0], Vector3::z());
    }

    #[test]
    fn test_decode_binary_box_faces() {
        let bytes = binary_box_faces([-1.0, 2.0, 3.0], [5.0, 4.0, 7.0]);
        let mesh = decode_stl(&bytes).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        let bbox = mesh.bounding_box().unwrap();
        assert_eq!(bbox.min, Point3::new(-1.0, 2.0, 3.0));
        assert_eq!(bbox.max, Point3::new(5.0, 4.0, 7.0));
    }

    #[test]
    fn test_binary_zero_normals_are_recomputed() {
        let bytes = binary_stl(&[[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]]);
        let mesh = decode_stl(&bytes).unwrap();
        assert_eq!(mesh.normals[0], Vector3::z());
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let result = decode_stl(b"definitely not an stl file");
        assert!(matches!(result, Err(ModelLoadError::Decode(_))));
    }

    #[test]
    fn test_file_without_facets_is_rejected() {
        let bytes = binary_stl(&[]);
        let result = decode_stl(&bytes);
        assert!(matches!(result, Err(ModelLoadError::EmptyMesh) | Err(ModelLoadError::Decode(_))));
    }
}
