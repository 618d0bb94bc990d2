//! Scene graph: fixed lighting and grid plus at most one model mesh.

use std::sync::Arc;

use egui::Color32;
use nalgebra::{Point3, Vector3};

use super::grid::InfiniteGrid;
use crate::model::{BoundingBox3, Mesh3D};

pub const BACKGROUND_COLOR: Color32 = hex_color(0x2b2d3c);
pub const MODEL_COLOR: Color32 = hex_color(0x00ff00);
pub const GRID_COLOR: Color32 = hex_color(0xc0c0c0);

const fn hex_color(hex: u32) -> Color32 {
    Color32::from_rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Tag fixed at node creation. Swaps only ever remove `Model` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Fixture,
    Model,
}

/// A shaded mesh placed in the scene
#[derive(Debug, Clone)]
pub struct MeshNode {
    pub geometry: Arc<Mesh3D>,
    pub color: Color32,
    /// World-space translation applied to every vertex
    pub offset: Vector3<f32>,
}

impl MeshNode {
    /// Bounding box after `offset` is applied
    pub fn world_bounds(&self) -> Option<BoundingBox3> {
        self.geometry.bounding_box().map(|b| b.translated(&self.offset))
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    AmbientLight { color: Color32, intensity: f32 },
    DirectionalLight { color: Color32, intensity: f32, position: Vector3<f32> },
    Grid(InfiniteGrid),
    Mesh(MeshNode),
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub role: NodeRole,
    pub kind: NodeKind,
}

impl SceneNode {
    fn fixture(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            role: NodeRole::Fixture,
            kind,
        }
    }

    fn model(name: &str, mesh: MeshNode) -> Self {
        Self {
            name: name.to_string(),
            role: NodeRole::Model,
            kind: NodeKind::Mesh(mesh),
        }
    }
}

/// Where a swapped-in model ended up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPlacement {
    /// Bounds after recentering
    pub bounds: BoundingBox3,
    /// Camera home for this model, `(h, h, h)` with `h` half the largest extent
    pub home: Point3<f32>,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color32,
    nodes: Vec<SceneNode>,
}

/// Build the initial scene: lights, grid, and a sample box
pub fn setup_scene() -> Scene {
    let nodes = vec![
        SceneNode::fixture(
            "ambient",
            NodeKind::AmbientLight {
                color: Color32::WHITE,
                intensity: 0.5,
            },
        ),
        SceneNode::fixture(
            "directional",
            NodeKind::DirectionalLight {
                color: Color32::WHITE,
                intensity: 1.0,
                position: Vector3::new(1.0, 1.0, 1.0),
            },
        ),
        SceneNode::fixture("grid", NodeKind::Grid(InfiniteGrid::new(20.0, 500.0, GRID_COLOR, 3500.0))),
        SceneNode::model(
            "sample box",
            MeshNode {
                geometry: Arc::new(Mesh3D::cuboid(4.0, 4.0, 4.0)),
                color: MODEL_COLOR,
                offset: Vector3::zeros(),
            },
        ),
    ];

    Scene {
        background: BACKGROUND_COLOR,
        nodes,
    }
}

impl Scene {
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn fixture_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.role == NodeRole::Fixture).count()
    }

    pub fn model_nodes(&self) -> impl Iterator<Item = &MeshNode> {
        self.nodes.iter().filter_map(|n| match (&n.role, &n.kind) {
            (NodeRole::Model, NodeKind::Mesh(mesh)) => Some(mesh),
            _ => None,
        })
    }

    /// Replace every non-fixture node with `geometry`, recentered on the origin
    pub fn swap_model(&mut self, name: &str, geometry: Arc<Mesh3D>) -> ModelPlacement {
        self.nodes.retain(|n| n.role == NodeRole::Fixture);

        let raw_bounds = geometry.bounding_box().unwrap_or(BoundingBox3 {
            min: Point3::origin(),
            max: Point3::origin(),
        });
        let offset = -raw_bounds.center().coords;
        let bounds = raw_bounds.translated(&offset);

        self.nodes.push(SceneNode::model(
            name,
            MeshNode {
                geometry,
                color: MODEL_COLOR,
                offset,
            },
        ));

        let h = bounds.max_dimension() / 2.0;
        ModelPlacement {
            bounds,
            home: Point3::new(h, h, h),
        }
    }

    /// Combined ambient color and the directional lights as (direction, color)
    pub fn lighting(&self) -> (Vector3<f32>, Vec<(Vector3<f32>, Vector3<f32>)>) {
        let mut ambient = Vector3::zeros();
        let mut directional = Vec::new();
        for node in &self.nodes {
            match &node.kind {
                NodeKind::AmbientLight { color, intensity } => ambient += color_vec(*color) * *intensity,
                NodeKind::DirectionalLight {
                    color,
                    intensity,
                    position,
                } => {
                    if let Some(dir) = position.try_normalize(f32::EPSILON) {
                        directional.push((dir, color_vec(*color) * *intensity));
                    }
                }
                _ => {}
            }
        }
        (ambient, directional)
    }

    pub fn grids(&self) -> impl Iterator<Item = &InfiniteGrid> {
        self.nodes.iter().filter_map(|n| match &n.kind {
            NodeKind::Grid(grid) => Some(grid),
            _ => None,
        })
    }

    pub fn meshes(&self) -> impl Iterator<Item = &MeshNode> {
        self.nodes.iter().filter_map(|n| match &n.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        })
    }
}

fn color_vec(color: Color32) -> Vector3<f32> {
    Vector3::new(color.r() as f32, color.g() as f32, color.b() as f32) / 255.0
}
