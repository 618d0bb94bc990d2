use egui::{Color32, RichText, Stroke};
use egui_lens::{LogColors, ReactiveEventLogger, ReactiveEventLoggerState};
use egui_mobius_reactive::Dynamic;

use crate::ThreeCadApp;
use crate::constants::*;
use crate::model::LocalFile;
use crate::ui::console;

/// Loaded models, the drop zone and the file picker
pub fn show_inspector_panel<'a>(
    ui: &mut egui::Ui,
    app: &'a mut ThreeCadApp,
    logger_state: &'a Dynamic<ReactiveEventLoggerState>,
    log_colors: &'a Dynamic<LogColors>,
) {
    let logger = ReactiveEventLogger::with_colors(logger_state, log_colors);

    let active = app.session.library.active_index();
    let mut clicked = None;
    if !app.session.library.is_empty() {
        ui.heading("Models");
        ui.separator();
        egui::ScrollArea::vertical()
            .id_salt("model_list")
            .max_height((ui.available_height() - DROP_ZONE_HEIGHT - 160.0).max(80.0))
            .show(ui, |ui| {
                for (index, model) in app.session.library.models().iter().enumerate() {
                    let label = ui.selectable_label(active == Some(index), format!("📄 {}", model.name));
                    if label.clicked() {
                        clicked = Some(index);
                    }
                }
            });
        ui.add_space(8.0);
    }
    if let Some(index) = clicked {
        app.activate_from_library(index);
    }

    let hovering_files = ui.input(|i| !i.raw.hovered_files.is_empty());
    let stroke = if hovering_files {
        Stroke::new(2.0, Color32::from_rgb(59, 130, 246))
    } else {
        Stroke::new(1.0, Color32::from_gray(110))
    };
    let text = if app.session.library.is_empty() { DROP_ZONE_TEXT } else { "+" };
    egui::Frame::NONE
        .stroke(stroke)
        .corner_radius(8.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.set_height(DROP_ZONE_HEIGHT);
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(text).color(Color32::GRAY));
            });
        });

    ui.add_space(4.0);
    if ui.button("📂 Browse…").clicked() {
        console::info(&logger, "Opening STL file dialog");
        if let Some(path) = rfd::FileDialog::new().add_filter("STL", &["stl", "STL"]).pick_file() {
            app.start_import(vec![LocalFile::from_path(path)]);
        }
    }

    if let Some(model) = app.session.library.active() {
        ui.add_space(8.0);
        ui.separator();
        let stats = model.geometry.stats();
        egui::Grid::new("active_model_info")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label("Active");
                ui.label(RichText::new(&model.name).strong());
                ui.end_row();

                ui.label("Triangles");
                ui.label(stats.triangle_count.to_string());
                ui.end_row();

                ui.label("Vertices");
                ui.label(stats.vertex_count.to_string());
                ui.end_row();

                if let Some(bounds) = model.geometry.bounding_box() {
                    let size = bounds.size();
                    ui.label("Size");
                    ui.label(format!("{:.2} × {:.2} × {:.2}", size.x, size.y, size.z));
                    ui.end_row();
                }
            });
    }
}
