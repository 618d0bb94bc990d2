use crate::catalog::CatalogError;
use crate::tasks::TaskPanic;

/// Errors raised while acquiring or decoding a model
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("No file was dropped")]
    NoFile,

    #[error("Expected a single model file, got {0}")]
    MultipleFiles(usize),

    #[error("Unsupported model file: {0}")]
    UnsupportedFile(String),

    #[error("Failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load STL file: {0}")]
    Decode(String),

    #[error("STL file contains no facets")]
    EmptyMesh,

    #[error("Error fetching model: {0}")]
    Fetch(#[from] CatalogError),

    #[error(transparent)]
    Task(#[from] TaskPanic),
}

impl ModelLoadError {
    /// Message shown in the user-facing alert
    pub fn alert_message(&self) -> String {
        match self {
            ModelLoadError::NoFile => "No file was dropped".to_string(),
            ModelLoadError::MultipleFiles(_) | ModelLoadError::UnsupportedFile(_) => {
                "Please drop a valid model file".to_string()
            }
            ModelLoadError::Fetch(_) => "Error fetching model. Check the event log for more details.".to_string(),
            ModelLoadError::Io(_) | ModelLoadError::Decode(_) | ModelLoadError::EmptyMesh | ModelLoadError::Task(_) => {
                "Error loading model file. Check the event log for more details.".to_string()
            }
        }
    }

    /// Rejections of the input itself, as opposed to failures while loading it
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ModelLoadError::NoFile | ModelLoadError::MultipleFiles(_) | ModelLoadError::UnsupportedFile(_)
        )
    }
}
