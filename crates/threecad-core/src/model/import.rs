//! Local file ingestion (drag-and-drop and the file picker).

use std::path::PathBuf;
use std::sync::Arc;

use super::error::ModelLoadError;
use super::stl::{decode_stl, is_supported_file};
use super::Model;

/// Where the bytes of a local file come from
#[derive(Debug, Clone)]
pub enum FilePayload {
    /// Bytes delivered with the drop (web and some native backends)
    Bytes(Arc<[u8]>),
    /// Path on disk, read lazily on the import task
    Path(PathBuf),
}

/// A local file handed to the viewer
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub payload: FilePayload,
}

impl LocalFile {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            name,
            payload: FilePayload::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            payload: FilePayload::Bytes(bytes.into()),
        }
    }

    /// Build from an egui drop. egui leaves `name` empty on native, so fall back to the path.
    pub fn from_dropped(file: &egui::DroppedFile) -> Option<Self> {
        if let Some(bytes) = &file.bytes {
            let name = if file.name.is_empty() {
                file.path
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default()
            } else {
                file.name.clone()
            };
            return Some(Self::from_bytes(name, bytes.clone()));
        }
        file.path.clone().map(Self::from_path)
    }

    fn read(&self) -> Result<Arc<[u8]>, ModelLoadError> {
        match &self.payload {
            FilePayload::Bytes(bytes) => Ok(bytes.clone()),
            FilePayload::Path(path) => Ok(std::fs::read(path)?.into()),
        }
    }
}

/// Accept exactly one file with a supported extension
pub fn validate_drop(mut files: Vec<LocalFile>) -> Result<LocalFile, ModelLoadError> {
    match files.len() {
        0 => Err(ModelLoadError::NoFile),
        1 => {
            let file = files.remove(0);
            if is_supported_file(&file.name) {
                Ok(file)
            } else {
                Err(ModelLoadError::UnsupportedFile(file.name))
            }
        }
        n => Err(ModelLoadError::MultipleFiles(n)),
    }
}

/// Read and decode a validated local file into a model
pub fn load_local_file(file: &LocalFile) -> Result<Model, ModelLoadError> {
    let bytes = file.read()?;
    let geometry = decode_stl(&bytes)?;
    Ok(Model::new(file.name.clone(), geometry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::stl::fixtures::ASCII_TRIANGLE;

    fn bytes_file(name: &str, data: &[u8]) -> LocalFile {
        LocalFile::from_bytes(name, data.to_vec())
    }

    #[test]
    fn test_empty_drop_is_rejected() {
        assert!(matches!(validate_drop(vec![]), Err(ModelLoadError::NoFile)));
    }

    #[test]
    fn test_multiple_files_are_rejected() {
        let files = vec![bytes_file("a.stl", b""), bytes_file("b.stl", b"")];
        assert!(matches!(validate_drop(files), Err(ModelLoadError::MultipleFiles(2))));
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let result = validate_drop(vec![bytes_file("teapot.obj", b"")]);
        match result {
            Err(ModelLoadError::UnsupportedFile(name)) => assert_eq!(name, "teapot.obj"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_uppercase_extension_is_accepted() {
        let file = validate_drop(vec![bytes_file("BRACKET.STL", b"")]).unwrap();
        assert_eq!(file.name, "BRACKET.STL");
    }

    #[test]
    fn test_load_from_bytes() {
        let file = bytes_file("tri.stl", ASCII_TRIANGLE.as_bytes());
        let model = load_local_file(&file).unwrap();
        assert_eq!(model.name, "tri.stl");
        assert_eq!(model.geometry.triangle_count(), 1);
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let file = LocalFile::from_path(PathBuf::from("/nonexistent/dir/part.stl"));
        assert_eq!(file.name, "part.stl");
        assert!(matches!(load_local_file(&file), Err(ModelLoadError::Io(_))));
    }

    #[test]
    fn test_load_from_path() {
        let path = std::env::temp_dir().join(format!("threecad-import-{}.stl", std::process::id()));
        std::fs::write(&path, ASCII_TRIANGLE).unwrap();
        let model = load_local_file(&LocalFile::from_path(path.clone())).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(model.geometry.triangle_count(), 1);
    }
}
