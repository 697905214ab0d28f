use eframe::egui;
use rusty_mandate::state::{AppState, SessionState};

use crate::ui::{panels, views, ViewMode};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MandateApp {
    pub state: AppState,
    pub mode: ViewMode,
    /// Region shown on the deep-dive page.
    pub selected_region: Option<String>,
}

impl MandateApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            mode: ViewMode::default(),
            selected_region: None,
        }
    }
}

impl eframe::App for MandateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // A freshly loaded dataset has not been through the pipeline yet.
        if self.state.state == SessionState::Ready {
            self.state.refilter();
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: navigation + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &mut self.mode);
            });

        // ---- Central panel: current page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            views::central(ui, &self.state, self.mode, &mut self.selected_region);
        });
    }
}
