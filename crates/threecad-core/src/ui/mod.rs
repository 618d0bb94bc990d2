pub mod alert;
pub mod console;
pub mod inspector_panel;
pub mod projects_panel;
pub mod search_panel;
pub mod selection;
pub mod tabs;
pub mod viewer_panel;

// Re-export the show functions for each panel
pub use inspector_panel::show_inspector_panel;
pub use projects_panel::show_projects_panel;
pub use search_panel::show_search_panel;
pub use viewer_panel::show_viewer_panel;

pub use alert::AlertQueue;

// Re-export tab-related types
pub use tabs::{Tab, TabKind, TabViewer};

pub use selection::initialize_and_show_banner;
