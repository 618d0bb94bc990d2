use std::collections::VecDeque;
use std::sync::Arc;

use egui::Rect;
use egui_dock::{DockArea, DockState, NodeIndex, Style, SurfaceIndex};

/// egui_lens imports
use egui_lens::{LogColors, ReactiveEventLogger, ReactiveEventLoggerState};
use egui_mobius_reactive::Dynamic;

use crate::catalog::{CatalogApi, CatalogError, HttpCatalog, SearchResult};
use crate::config::{ApiConfig, BuildMode, DEV_API_BASE_URL};
use crate::constants::*;
use crate::model::{LocalFile, Model, ModelLoadError};
use crate::session::{FetchRequest, FetchedModel, ModelActivation, ModelArrival, SearchOutcome, Session, SessionError};
use crate::tasks::{PendingTask, poll_slot};
use crate::ui::{self, AlertQueue, Tab, TabKind, TabViewer, console, initialize_and_show_banner};
use crate::viewer3d::ViewportError;

type SearchTask = PendingTask<Result<Vec<SearchResult>, CatalogError>>;
type ImportTask = PendingTask<Result<Model, ModelLoadError>>;

/// The main application struct
pub struct ThreeCadApp {
    pub session: Session,

    // Logger state and colors
    pub logger_state: Dynamic<ReactiveEventLoggerState>,
    pub log_colors: Dynamic<LogColors>,

    pub alerts: AlertQueue,

    /// Set by the viewer panel on every frame it is drawn
    pub viewer_shown: bool,

    dock_state: DockState<Tab>,
    catalog: Arc<dyn CatalogApi>,

    // Background work, newest request of each kind only
    pending_search: Option<SearchTask>,
    pending_fetch: Option<(FetchRequest, PendingTask<FetchedModel>)>,
    pending_imports: VecDeque<ImportTask>,

    /// Search box plus open dropdown, as drawn on the last frame
    search_container: Option<Rect>,
}

impl Default for ThreeCadApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ThreeCadApp {
    fn drop(&mut self) {
        self.session.viewport.unmount();
    }
}

impl ThreeCadApp {
    /// **Create a new instance of the ThreeCadApp**
    ///
    /// Resolves the catalog address for the current build, sets up the event
    /// log and the dock layout, and logs the start-up banner.
    pub fn new() -> Self {
        let config = ApiConfig::resolve(BuildMode::current(), None);
        let used_fallback = config.used_fallback;
        let app = Self::with_catalog(Arc::new(HttpCatalog::new(config)));
        if used_fallback {
            let logger = ReactiveEventLogger::with_colors(&app.logger_state, &app.log_colors);
            console::warning(
                &logger,
                &format!("No origin to serve the catalog from, using {}", DEV_API_BASE_URL),
            );
        }
        app
    }

    /// Build the app around any catalog implementation
    pub fn with_catalog(catalog: Arc<dyn CatalogApi>) -> Self {
        let mut initial_logger_state = ReactiveEventLoggerState::new();
        // Set timestamp to be unchecked by default
        initial_logger_state.show_timestamps = false;
        let logger_state = Dynamic::new(initial_logger_state);
        let log_colors = Dynamic::new(LogColors::default());

        let app = Self {
            session: Session::new(),
            logger_state,
            log_colors,
            alerts: AlertQueue::new(),
            viewer_shown: false,
            dock_state: Self::create_default_dock_state(),
            catalog,
            pending_search: None,
            pending_fetch: None,
            pending_imports: VecDeque::new(),
            search_container: None,
        };

        let logger = ReactiveEventLogger::with_colors(&app.logger_state, &app.log_colors);
        initialize_and_show_banner(&logger);

        app
    }

    fn create_default_dock_state() -> DockState<Tab> {
        let viewer_tab = Tab::new(TabKind::Viewer, SurfaceIndex::main(), NodeIndex(0));
        let inspector_tab = Tab::new(TabKind::Inspector, SurfaceIndex::main(), NodeIndex(1));
        let projects_tab = Tab::new(TabKind::Projects, SurfaceIndex::main(), NodeIndex(2));
        let log_tab = Tab::new(TabKind::EventLog, SurfaceIndex::main(), NodeIndex(3));

        // Create dock state with the viewer as the root
        let mut dock_state = DockState::new(vec![viewer_tab]);
        let surface = dock_state.main_surface_mut();

        // Split left for the inspector
        let [left, _right] = surface.split_left(
            NodeIndex::root(),
            0.25, // Left panel takes 25% of width
            vec![inspector_tab, projects_tab],
        );

        // Add event log to bottom of left panel
        surface.split_below(
            left,
            0.6, // Top takes 60% of height
            vec![log_tab],
        );

        dock_state
    }

    fn logger_handles(&self) -> (Dynamic<ReactiveEventLoggerState>, Dynamic<LogColors>) {
        (self.logger_state.clone(), self.log_colors.clone())
    }

    /// Submit the current query on a background task
    pub fn start_search(&mut self) {
        let Some(request) = self.session.search.submit() else {
            return;
        };
        let (logger_state, log_colors) = self.logger_handles();
        let logger = ReactiveEventLogger::with_colors(&logger_state, &log_colors);
        console::custom(&logger, LOG_TYPE_SEARCH, &format!("Searching for '{}'", request.query));

        let catalog = self.catalog.clone();
        let generation = request.generation;
        self.pending_search = Some(PendingTask::spawn("search", generation, move || {
            request.run(catalog.as_ref())
        }));
    }

    /// Download `result` in the selected file variant
    pub fn start_fetch(&mut self, result: &SearchResult) {
        let request = self.session.begin_fetch(result);
        let (logger_state, log_colors) = self.logger_handles();
        let logger = ReactiveEventLogger::with_colors(&logger_state, &log_colors);
        console::custom(&logger, LOG_TYPE_FETCH, &format!("Model selected: {}", request.filename));

        let catalog = self.catalog.clone();
        let job = request.clone();
        let task = PendingTask::spawn("fetch", request.generation, move || job.run(catalog.as_ref()));
        self.pending_fetch = Some((request, task));
    }

    /// Validate dropped or picked files and decode the accepted one in the background
    pub fn start_import(&mut self, files: Vec<LocalFile>) {
        let (logger_state, log_colors) = self.logger_handles();
        let logger = ReactiveEventLogger::with_colors(&logger_state, &log_colors);

        match self.session.begin_import(files) {
            Ok(request) => {
                console::custom(&logger, LOG_TYPE_FETCH, &format!("Loading {}", request.file.name));
                self.pending_imports
                    .push_back(PendingTask::spawn("import", request.activation, move || request.run()));
            }
            Err(e) => {
                console::warning(&logger, &e.to_string());
                self.alerts.push(e.alert_message());
            }
        }
    }

    /// Re-show a model that is already in the library
    pub fn activate_from_library(&mut self, index: usize) {
        let result = self.session.activate_model(index, 0);
        self.report_activation(result);
    }

    pub fn has_pending_tasks(&self) -> bool {
        self.pending_search.is_some() || self.pending_fetch.is_some() || !self.pending_imports.is_empty()
    }

    /// Apply every background result that has arrived
    pub fn poll_tasks(&mut self) {
        let (logger_state, log_colors) = self.logger_handles();
        let logger = ReactiveEventLogger::with_colors(&logger_state, &log_colors);

        if let Some(done) = poll_slot(&mut self.pending_search) {
            let result = done.value.unwrap_or_else(|e| Err(e.into()));
            match self.session.search.complete(done.generation, result) {
                SearchOutcome::Loaded(count) => console::custom(
                    &logger,
                    LOG_TYPE_SEARCH,
                    &format!("Found {} results in {} ms", count, done.elapsed.as_millis()),
                ),
                SearchOutcome::Failed(e) => console::error(&logger, &format!("Error fetching search results: {}", e)),
                SearchOutcome::Stale => {}
            }
        }

        if let Some((request, task)) = self.pending_fetch.take() {
            match task.try_complete() {
                Ok(done) => {
                    let fetched = done.value.unwrap_or_else(|e| FetchedModel {
                        result: Err(ModelLoadError::Fetch(e.into())),
                        fetch_ms: 0,
                    });
                    let fetch_ms = fetched.fetch_ms;
                    if let Some(result) = self.session.complete_fetch(&request, fetched) {
                        if result.is_ok() {
                            console::custom(&logger, LOG_TYPE_FETCH, &format!("Model fetched in: {} ms", fetch_ms));
                        }
                        self.report_arrival(result);
                    }
                }
                Err(task) => self.pending_fetch = Some((request, task)),
            }
        }

        while let Some(task) = self.pending_imports.pop_front() {
            match task.try_complete() {
                Ok(done) => {
                    let loaded = done.value.unwrap_or_else(|e| Err(e.into()));
                    let result = self.session.complete_import(done.generation, loaded);
                    self.report_arrival(result);
                }
                Err(task) => {
                    self.pending_imports.push_front(task);
                    break;
                }
            }
        }
    }

    fn report_arrival(&mut self, result: Result<ModelArrival, SessionError>) {
        match result {
            Ok(ModelArrival::Shown(activation)) => self.report_activation(Ok(activation)),
            Ok(ModelArrival::Stored(index)) => {
                let (logger_state, log_colors) = self.logger_handles();
                let logger = ReactiveEventLogger::with_colors(&logger_state, &log_colors);
                let name = self.session.library.get(index).map(|m| m.name.as_str()).unwrap_or_default();
                console::info(&logger, &format!("Added {} to the library; a newer selection stays in view", name));
            }
            Err(e) => self.report_activation(Err(e)),
        }
    }

    fn report_activation(&mut self, result: Result<ModelActivation, SessionError>) {
        let (logger_state, log_colors) = self.logger_handles();
        let logger = ReactiveEventLogger::with_colors(&logger_state, &log_colors);

        match result {
            Ok(activation) => {
                let name = self
                    .session
                    .library
                    .get(activation.index)
                    .map(|m| m.name.clone())
                    .unwrap_or_default();
                console::info(&logger, &format!("Model loaded in: {} ms", activation.build_ms));
                let home = activation.placement.home;
                console::custom(
                    &logger,
                    LOG_TYPE_VIEWPORT,
                    &format!("Showing {} (home {:.1}, {:.1}, {:.1})", name, home.x, home.y, home.z),
                );
            }
            Err(SessionError::Load(e)) => {
                if e.is_rejection() {
                    console::warning(&logger, &e.to_string());
                } else {
                    console::error(&logger, &format!("Error loading model file: {}", e));
                }
                self.alerts.push(e.alert_message());
            }
            Err(SessionError::Viewport(ViewportError::NotMounted)) => {
                console::warning(&logger, "Viewer is not open; the model was kept in the library");
            }
            Err(e @ SessionError::UnknownModel(_)) => {
                console::error(&logger, &e.to_string());
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        let files = dropped.iter().filter_map(LocalFile::from_dropped).collect();
        self.start_import(files);
    }

    fn dismiss_search_on_outside_press(&mut self, ctx: &egui::Context) {
        // Presses on a pending alert belong to the alert
        if !self.alerts.is_empty() {
            return;
        }
        let Some(container) = self.search_container else {
            return;
        };
        let press = ctx.input(|i| if i.pointer.any_pressed() { i.pointer.interact_pos() } else { None });
        if let Some(press) = press {
            if self.session.search.dismiss_on_press(container, press) {
                log::debug!("Search results dismissed");
            }
        }
    }

    /// Draw one frame of the whole application
    pub fn show(&mut self, ctx: &egui::Context) {
        self.poll_tasks();
        self.handle_dropped_files(ctx);

        let (logger_state, log_colors) = self.logger_handles();
        egui::TopBottomPanel::top("search_header").show(ctx, |ui| {
            ui.add_space(12.0);
            let container = ui::show_search_panel(ui, self, &logger_state, &log_colors);
            self.search_container = Some(container);
            ui.add_space(4.0);
        });

        self.viewer_shown = false;

        // Main dock area below the header
        let mut dock_state = self.dock_state.clone();
        let mut tab_viewer = TabViewer { app: self };
        let mut style = Style::from_egui(ctx.style().as_ref());
        style.dock_area_padding = None;
        style.tab_bar.fill_tab_bar = true;

        DockArea::new(&mut dock_state)
            .style(style)
            .show_add_buttons(false)
            .show_close_buttons(false)
            .show(ctx, &mut tab_viewer);

        self.dock_state = dock_state;

        if !self.viewer_shown && self.session.viewport.is_mounted() {
            self.session.viewport.unmount();
            let logger = ReactiveEventLogger::with_colors(&logger_state, &log_colors);
            console::custom(&logger, LOG_TYPE_VIEWPORT, "Viewer unmounted");
        }

        self.dismiss_search_on_outside_press(ctx);
        self.alerts.show(ctx);

        // Promises do not wake the UI on their own
        if self.has_pending_tasks() {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for ThreeCadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}
