//! Session orchestration: search, model acquisition and model activation.
//!
//! Nothing in here touches egui widgets. Requests are handed out as plain
//! values the app runs on background tasks; their results come back through
//! the `complete_*` methods. A download issued before a newer download is
//! dropped. A download or import issued before a newer activation request
//! (another download, import or library pick) only joins the library.

use std::time::Instant;

use egui::{Pos2, Rect};

use crate::catalog::{CatalogApi, CatalogError, FileVariant, SearchResult};
use crate::model::{LocalFile, Model, ModelLibrary, ModelLoadError, decode_stl, is_supported_file, load_local_file, validate_drop};
use crate::tasks::Generation;
use crate::viewer3d::{ModelPlacement, Viewport, ViewportError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] ModelLoadError),

    #[error(transparent)]
    Viewport(#[from] ViewportError),

    #[error("No model at index {0}")]
    UnknownModel(usize),
}

/// A search ready to run off the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
}

impl SearchRequest {
    pub fn run(&self, catalog: &dyn CatalogApi) -> Result<Vec<SearchResult>, CatalogError> {
        catalog.search(&self.query)
    }
}

/// What a finished search did to the result list
#[derive(Debug)]
pub enum SearchOutcome {
    /// A newer search was issued meanwhile; nothing changed
    Stale,
    Loaded(usize),
    /// Results were cleared; the panel shows its empty state
    Failed(CatalogError),
}

/// Query box, result dropdown and its loading state
#[derive(Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub loading: bool,
    pub panel_open: bool,
    generation: Generation,
}

impl SearchState {
    /// Start a search for the current query. Blank queries are ignored.
    pub fn submit(&mut self) -> Option<SearchRequest> {
        if self.query.trim().is_empty() {
            return None;
        }
        self.loading = true;
        self.panel_open = true;
        Some(SearchRequest {
            generation: self.generation.next(),
            query: self.query.clone(),
        })
    }

    pub fn complete(&mut self, generation: u64, result: Result<Vec<SearchResult>, CatalogError>) -> SearchOutcome {
        if !self.generation.is_current(generation) {
            log::debug!("Dropping stale search response (generation {})", generation);
            return SearchOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(results) => {
                self.results = results;
                SearchOutcome::Loaded(self.results.len())
            }
            Err(e) => {
                self.results.clear();
                SearchOutcome::Failed(e)
            }
        }
    }

    /// Close the open panel when a press lands outside `container`
    pub fn dismiss_on_press(&mut self, container: Rect, press: Pos2) -> bool {
        if self.panel_open && !container.contains(press) {
            self.panel_open = false;
            return true;
        }
        false
    }
}

/// A model download ready to run off the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    /// Activation ticket; see `Session::complete_fetch`
    pub activation: u64,
    pub filename: String,
    /// Path under `/file/` for the chosen variant
    pub path: String,
}

/// Result of running a `FetchRequest`
#[derive(Debug)]
pub struct FetchedModel {
    pub result: Result<Model, ModelLoadError>,
    /// Wall time of the download alone
    pub fetch_ms: u64,
}

impl FetchRequest {
    /// Download, check the extension, then decode
    pub fn run(&self, catalog: &dyn CatalogApi) -> FetchedModel {
        let started = Instant::now();
        let bytes = catalog.fetch_model(&self.path);
        let fetch_ms = started.elapsed().as_millis() as u64;
        log::debug!("Fetched {} in {} ms", self.path, fetch_ms);

        let result = bytes.map_err(ModelLoadError::from).and_then(|bytes| {
            if !is_supported_file(&self.filename) {
                return Err(ModelLoadError::UnsupportedFile(self.filename.clone()));
            }
            Ok(Model::new(self.filename.clone(), decode_stl(&bytes)?))
        });
        FetchedModel { result, fetch_ms }
    }
}

/// An accepted drop or pick ready to decode off the UI thread
#[derive(Debug)]
pub struct ImportRequest {
    pub activation: u64,
    pub file: LocalFile,
}

impl ImportRequest {
    pub fn run(&self) -> Result<Model, ModelLoadError> {
        load_local_file(&self.file)
    }
}

/// A model that made it into the viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ModelActivation {
    pub index: usize,
    pub placement: ModelPlacement,
    /// Time spent building and inserting the scene node
    pub build_ms: u64,
}

/// Where a finished download or import ended up
#[derive(Debug, Clone, PartialEq)]
pub enum ModelArrival {
    Shown(ModelActivation),
    /// Another model was requested meanwhile; this one only joined the library
    Stored(usize),
}

/// Everything the viewer knows for the lifetime of the window
#[derive(Debug, Default)]
pub struct Session {
    pub library: ModelLibrary,
    pub viewport: Viewport,
    pub search: SearchState,
    pub file_variant: FileVariant,
    /// Shown in the viewport overlay
    pub fetch_time_ms: u64,
    fetch_generation: Generation,
    /// Bumped by every request that wants to change the active model
    activation_generation: Generation,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare the download of `result` in the selected variant
    pub fn begin_fetch(&mut self, result: &SearchResult) -> FetchRequest {
        FetchRequest {
            generation: self.fetch_generation.next(),
            activation: self.activation_generation.next(),
            filename: result.filename.clone(),
            path: self.file_variant.model_path(&result.filename),
        }
    }

    /// Apply a finished download. `None` when a newer download superseded it.
    pub fn complete_fetch(&mut self, request: &FetchRequest, fetched: FetchedModel) -> Option<Result<ModelArrival, SessionError>> {
        if !self.fetch_generation.is_current(request.generation) {
            log::debug!("Dropping stale model download (generation {})", request.generation);
            return None;
        }
        Some(match fetched.result {
            Ok(model) => self.arrive(model, fetched.fetch_ms, request.activation),
            Err(e) => Err(e.into()),
        })
    }

    /// Validate a drop or pick. Rejections leave the session untouched.
    pub fn begin_import(&mut self, files: Vec<LocalFile>) -> Result<ImportRequest, ModelLoadError> {
        let file = validate_drop(files)?;
        Ok(ImportRequest {
            activation: self.activation_generation.next(),
            file,
        })
    }

    /// Apply a finished local import. Local files show a fetch time of 0.
    pub fn complete_import(&mut self, activation: u64, result: Result<Model, ModelLoadError>) -> Result<ModelArrival, SessionError> {
        self.arrive(result?, 0, activation)
    }

    fn arrive(&mut self, model: Model, fetch_ms: u64, activation: u64) -> Result<ModelArrival, SessionError> {
        if !self.activation_generation.is_current(activation) {
            log::debug!("Keeping {} in the library without showing it (ticket {})", model.name, activation);
            return Ok(ModelArrival::Stored(self.library.push(model)));
        }
        self.add_model(model, fetch_ms).map(ModelArrival::Shown)
    }

    /// Append to the library and activate
    pub fn add_model(&mut self, model: Model, fetch_ms: u64) -> Result<ModelActivation, SessionError> {
        let index = self.library.push(model);
        self.activate_model(index, fetch_ms)
    }

    /// Show library entry `index` in the viewport
    pub fn activate_model(&mut self, index: usize, fetch_ms: u64) -> Result<ModelActivation, SessionError> {
        let Some(model) = self.library.get(index) else {
            return Err(SessionError::UnknownModel(index));
        };
        self.activation_generation.next();
        self.fetch_time_ms = fetch_ms;
        let (name, geometry) = (model.name.clone(), model.geometry.clone());

        let started = Instant::now();
        let placement = self.viewport.show_model(&name, geometry)?;
        let build_ms = started.elapsed().as_millis() as u64;
        self.library.set_active(index);

        Ok(ModelActivation {
            index,
            placement,
            build_ms,
        })
    }

    /// Camera back to the active model's home
    pub fn reset_camera(&mut self) {
        self.viewport.reset_home();
    }
}
