// Custom log types for different event categories
pub const LOG_TYPE_SEARCH: &str = "search";
pub const LOG_TYPE_FETCH: &str = "fetch";
pub const LOG_TYPE_VIEWPORT: &str = "viewport";

// Search dropdown
pub const RESULTS_MAX_HEIGHT: f32 = 500.0;
pub const PREVIEW_SIZE: f32 = 64.0;
pub const NO_RESULTS_TEXT: &str = "No results found. Try a different search term.";

// Header
pub const SUBTITLE_TEXT: &str = "Explore Our 3D Model Database";
pub const SEARCH_HINT_TEXT: &str = "Search for 3D models...";
pub const SEARCH_BOX_MAX_WIDTH: f32 = 640.0;

// Inspector
pub const DROP_ZONE_TEXT: &str = "Drag and drop STL files here";
pub const DROP_ZONE_HEIGHT: f32 = 96.0;
