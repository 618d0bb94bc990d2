use egui_dock::{NodeIndex, SurfaceIndex};
use egui_lens::ReactiveEventLogger;

use crate::ThreeCadApp;
use crate::ui;

/// Define the tabs for the DockArea
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKind {
    Viewer,
    Inspector,
    Projects,
    EventLog,
}

pub struct TabParams<'a> {
    pub app: &'a mut ThreeCadApp,
}

/// Tab container struct for DockArea
#[derive(Debug, Clone)]
pub struct Tab {
    pub kind: TabKind,
    #[allow(dead_code)]
    pub surface: Option<SurfaceIndex>,
    #[allow(dead_code)]
    pub node: Option<NodeIndex>,
}

impl Tab {
    pub fn new(kind: TabKind, surface: SurfaceIndex, node: NodeIndex) -> Self {
        Self {
            kind,
            surface: Some(surface),
            node: Some(node),
        }
    }

    pub fn title(&self) -> String {
        match self.kind {
            TabKind::Viewer => "Viewer".to_string(),
            TabKind::Inspector => "Inspector".to_string(),
            TabKind::Projects => "Projects".to_string(),
            TabKind::EventLog => "Event Log".to_string(),
        }
    }

    pub fn content(&self, ui: &mut egui::Ui, params: &mut TabParams<'_>) {
        let logger_state = params.app.logger_state.clone();
        let log_colors = params.app.log_colors.clone();
        match self.kind {
            TabKind::Viewer => {
                ui::show_viewer_panel(ui, params.app, &logger_state, &log_colors);
            }
            TabKind::Inspector => {
                ui::show_inspector_panel(ui, params.app, &logger_state, &log_colors);
            }
            TabKind::Projects => {
                ui::show_projects_panel(ui);
            }
            TabKind::EventLog => {
                let logger = ReactiveEventLogger::with_colors(&logger_state, &log_colors);
                logger.show(ui);
            }
        }
    }
}

pub struct TabViewer<'a> {
    pub app: &'a mut ThreeCadApp,
}

impl<'a> egui_dock::TabViewer for TabViewer<'a> {
    type Tab = Tab;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        tab.title().into()
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut Self::Tab) {
        let mut params = TabParams { app: self.app };
        tab.content(ui, &mut params);
    }

    // The viewer draws its own background edge to edge
    fn clear_background(&self, tab: &Self::Tab) -> bool {
        tab.kind != TabKind::Viewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_titles() {
        let titles: Vec<String> = [TabKind::Viewer, TabKind::Inspector, TabKind::Projects, TabKind::EventLog]
            .into_iter()
            .enumerate()
            .map(|(i, kind)| Tab::new(kind, SurfaceIndex::main(), NodeIndex(i)).title())
            .collect();
        assert_eq!(titles, ["Viewer", "Inspector", "Projects", "Event Log"]);
    }
}
