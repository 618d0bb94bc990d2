//! Models loaded during the session.

pub mod error;
pub mod import;
pub mod mesh;
pub mod stl;

use std::sync::Arc;

pub use error::ModelLoadError;
pub use import::{LocalFile, load_local_file, validate_drop};
pub use mesh::{BoundingBox3, Mesh3D, MeshStats};
pub use stl::{decode_stl, is_supported_file};

/// A decoded model and the name it was loaded under
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub geometry: Arc<Mesh3D>,
}

impl Model {
    pub fn new(name: impl Into<String>, geometry: Mesh3D) -> Self {
        Self {
            name: name.into(),
            geometry: Arc::new(geometry),
        }
    }
}

/// Session-lifetime list of loaded models. Models are only ever appended.
#[derive(Debug, Default)]
pub struct ModelLibrary {
    models: Vec<Model>,
    active: Option<usize>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a model and return its index
    pub fn push(&mut self, model: Model) -> usize {
        self.models.push(model);
        self.models.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&Model> {
        self.active.and_then(|i| self.models.get(i))
    }

    /// Mark `index` active. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index < self.models.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }
}
