use egui::{Color32, Id, Rect, RichText, Sense, TextEdit, Vec2};
use egui_lens::{LogColors, ReactiveEventLogger, ReactiveEventLoggerState};
use egui_mobius_reactive::Dynamic;

use crate::ThreeCadApp;
use crate::catalog::{FileVariant, SearchResult};
use crate::constants::*;
use crate::platform::parameters::gui;
use crate::ui::console;

/// Header, search box, result dropdown and file variant selector.
///
/// Returns the rect covering the search box and, when open, the dropdown, so
/// the caller can dismiss the dropdown on presses outside it.
pub fn show_search_panel<'a>(
    ui: &mut egui::Ui,
    app: &'a mut ThreeCadApp,
    logger_state: &'a Dynamic<ReactiveEventLoggerState>,
    log_colors: &'a Dynamic<LogColors>,
) -> Rect {
    let logger = ReactiveEventLogger::with_colors(logger_state, log_colors);

    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(format!("📦 {}", gui::APPLICATION_NAME))
                .size(32.0)
                .strong()
                .color(Color32::from_rgb(59, 130, 246)),
        );
        ui.label(RichText::new(SUBTITLE_TEXT).size(18.0));
    });
    ui.add_space(8.0);

    let width = ui.available_width().min(SEARCH_BOX_MAX_WIDTH);
    let indent = (ui.available_width() - width) / 2.0;

    let box_rect = ui
        .horizontal(|ui| {
            ui.add_space(indent);
            let edit = ui.add(
                TextEdit::singleline(&mut app.session.search.query)
                    .hint_text(SEARCH_HINT_TEXT)
                    .desired_width(width - 40.0)
                    .margin(Vec2::new(12.0, 8.0)),
            );
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui.button("🔍").on_hover_text("Search").clicked();
            if submitted || clicked {
                app.start_search();
            }
        })
        .response
        .rect;

    let mut container = box_rect;
    let mut selected: Option<SearchResult> = None;

    if app.session.search.panel_open {
        let search = &app.session.search;
        let area = egui::Area::new(Id::new("search_results"))
            .order(egui::Order::Foreground)
            .fixed_pos(egui::pos2(box_rect.left() + indent, box_rect.bottom() + 2.0))
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(width);
                    egui::ScrollArea::vertical()
                        .max_height(RESULTS_MAX_HEIGHT)
                        .show(ui, |ui| {
                            if search.loading {
                                ui.vertical_centered(|ui| {
                                    ui.add_space(32.0);
                                    ui.add(egui::Spinner::new().size(32.0));
                                    ui.add_space(32.0);
                                });
                            } else if search.results.is_empty() {
                                ui.vertical_centered(|ui| {
                                    ui.add_space(32.0);
                                    ui.label(RichText::new(NO_RESULTS_TEXT).color(Color32::GRAY));
                                    ui.add_space(32.0);
                                });
                            } else {
                                for result in &search.results {
                                    if show_result_row(ui, result) {
                                        selected = Some(result.clone());
                                    }
                                    ui.separator();
                                }
                            }
                        });
                });
            });
        container = container.union(area.response.rect);
    }

    if let Some(result) = selected {
        app.start_fetch(&result);
    }

    // Hidden, but still laid out, while the dropdown covers it
    let variants_visible = !app.session.search.panel_open;
    ui.add_visible_ui(variants_visible, |ui| {
        ui.horizontal(|ui| {
            ui.add_space(indent);
            ui.label(RichText::new("File Type to Fetch:").small().weak());
            for variant in FileVariant::ALL {
                if ui
                    .radio_value(&mut app.session.file_variant, variant, RichText::new(variant.label()).small())
                    .changed()
                {
                    console::info(&logger, &format!("File type to fetch: {}", variant.label()));
                }
            }
        });
    });

    container
}

/// One clickable dropdown row. Returns true when clicked.
fn show_result_row(ui: &mut egui::Ui, result: &SearchResult) -> bool {
    let frame = egui::Frame::NONE.inner_margin(8.0).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            let size = Vec2::splat(PREVIEW_SIZE);
            match &result.preview {
                Some(url) => {
                    ui.add(egui::Image::from_uri(url.as_str()).fit_to_exact_size(size));
                }
                None => {
                    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
                    ui.painter().rect_filled(rect, 2.0, Color32::from_gray(40));
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "⚠",
                        egui::FontId::proportional(28.0),
                        Color32::from_gray(90),
                    );
                }
            }
            ui.add_space(12.0);
            ui.label(RichText::new(&result.display_name).size(16.0).strong());
        });
    });

    let response = frame.response.interact(Sense::click()).on_hover_cursor(egui::CursorIcon::PointingHand);
    if response.hovered() {
        ui.painter().rect_filled(response.rect, 2.0, Color32::from_white_alpha(8));
    }
    response.clicked()
}
