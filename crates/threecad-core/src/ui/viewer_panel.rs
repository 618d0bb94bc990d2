use egui::{Align2, Color32, FontId, PointerButton, Rect, Sense, Vec2, pos2, vec2};
use egui_lens::{LogColors, ReactiveEventLogger, ReactiveEventLoggerState};
use egui_mobius_reactive::Dynamic;

use crate::ThreeCadApp;
use crate::constants::LOG_TYPE_VIEWPORT;
use crate::ui::console;

const HOME_BUTTON_SIZE: f32 = 32.0;
const OVERLAY_MARGIN: f32 = 16.0;

/// The 3D viewport. Showing this panel mounts the viewport; the app unmounts
/// it on frames where the panel is not shown.
pub fn show_viewer_panel<'a>(
    ui: &mut egui::Ui,
    app: &'a mut ThreeCadApp,
    logger_state: &'a Dynamic<ReactiveEventLoggerState>,
    log_colors: &'a Dynamic<LogColors>,
) {
    let logger = ReactiveEventLogger::with_colors(logger_state, log_colors);
    app.viewer_shown = true;

    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return;
    }

    let viewport = &mut app.session.viewport;
    if viewport.is_mounted() {
        viewport.resize(rect.size());
    } else {
        viewport.mount(rect.size());
        console::custom(&logger, LOG_TYPE_VIEWPORT, "Viewer mounted");
    }

    let shift = ui.input(|i| i.modifiers.shift);
    let delta = response.drag_delta();
    if response.dragged_by(PointerButton::Primary) && !shift {
        viewport.rotate(delta, rect.height());
    } else if response.dragged_by(PointerButton::Secondary)
        || response.dragged_by(PointerButton::Middle)
        || (response.dragged_by(PointerButton::Primary) && shift)
    {
        viewport.pan(delta, rect.height());
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            viewport.dolly(scroll);
        }
    }

    let painter = ui.painter_at(rect);
    if viewport.frame(&painter, rect) {
        ui.ctx().request_repaint();
    }

    painter.text(
        rect.right_bottom() + vec2(-OVERLAY_MARGIN, -8.0),
        Align2::RIGHT_BOTTOM,
        format!("Fetch Time: {} ms", app.session.fetch_time_ms),
        FontId::proportional(14.0),
        Color32::from_white_alpha(51),
    );

    let home_rect = Rect::from_min_size(
        pos2(rect.right() - OVERLAY_MARGIN - HOME_BUTTON_SIZE, rect.top() + OVERLAY_MARGIN),
        Vec2::splat(HOME_BUTTON_SIZE),
    );
    if ui.put(home_rect, egui::Button::new("🏠")).on_hover_text("Home").clicked() {
        app.session.reset_camera();
        let home = app.session.viewport.home();
        console::custom(
            &logger,
            LOG_TYPE_VIEWPORT,
            &format!("Camera home ({:.1}, {:.1}, {:.1})", home.x, home.y, home.z),
        );
    }
}
