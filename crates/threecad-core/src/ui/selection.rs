use egui_lens::ReactiveEventLogger;

use crate::platform::banner;
use crate::ui::console;

/// Log the start-up banner to the Event Log
pub fn initialize_and_show_banner(logger: &ReactiveEventLogger) {
    let mut app_banner = banner::Banner::new();
    app_banner.format();
    console::info(logger, &app_banner.message);
}
