use egui::ViewportBuilder;

use threecad_core::ThreeCadApp;
use threecad_core::platform::parameters::gui;

/// The main function is the entry point of the application.
///
/// It initializes the logger, sets up the native window options,
/// installs the image loaders used for search previews and runs the
/// application using the `eframe` framework.
fn main() -> eframe::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_module("reqwest", log::LevelFilter::Warn)
        .init();
    eframe::run_native(
        gui::APPLICATION_NAME,
        eframe::NativeOptions {
            viewport: ViewportBuilder::default()
                .with_inner_size([gui::VIEWPORT_X, gui::VIEWPORT_Y])
                .with_drag_and_drop(true),
            ..Default::default()
        },
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(ThreeCadApp::new()))
        }),
    )
}
