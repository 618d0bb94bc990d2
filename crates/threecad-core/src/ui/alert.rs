//! Modal alerts, shown one at a time in the order they were raised.

use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct AlertQueue {
    pending: VecDeque<String>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.pending.push_back(message.into());
    }

    pub fn current(&self) -> Option<&str> {
        self.pending.front().map(String::as_str)
    }

    pub fn dismiss(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Draw the front alert centered over the window
    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(message) = self.current().map(str::to_owned) else {
            return;
        };

        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("alert_backdrop"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.allocate_rect(screen, egui::Sense::click());
                ui.painter().rect_filled(screen, 0.0, egui::Color32::from_black_alpha(96));
            });

        let mut dismissed = false;
        egui::Window::new("Alert")
            .collapsible(false)
            .resizable(false)
            .order(egui::Order::Tooltip)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.label(&message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() || ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.dismiss();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alerts_come_out_in_order() {
        let mut alerts = AlertQueue::new();
        assert!(alerts.current().is_none());

        alerts.push("No file was dropped");
        alerts.push("Please drop a valid model file");
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts.current(), Some("No file was dropped"));

        assert_eq!(alerts.dismiss().as_deref(), Some("No file was dropped"));
        assert_eq!(alerts.current(), Some("Please drop a valid model file"));
        alerts.dismiss();
        assert!(alerts.is_empty());
        assert!(alerts.dismiss().is_none());
    }

    #[test]
    fn test_show_without_alerts_draws_nothing() {
        let ctx = egui::Context::default();
        let mut alerts = AlertQueue::new();
        let output = ctx.run(egui::RawInput::default(), |ctx| alerts.show(ctx));
        assert!(output.shapes.is_empty());
    }
}
