use egui::RichText;

pub fn show_projects_panel(ui: &mut egui::Ui) {
    ui.heading("Projects");
    ui.separator();
    ui.label(RichText::new("No projects yet").weak());
}
