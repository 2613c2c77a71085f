use eframe::egui;

use crate::state::AppState;
use crate::ui::{chart, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PlotdeskApp {
    pub state: AppState,
}

impl Default for PlotdeskApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for PlotdeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters + plot lookup ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: detail cards for the selected plots ----
        if !self.state.detail_indices.is_empty() {
            egui::SidePanel::right("detail_panel")
                .default_width(320.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::detail_panel(ui, &self.state);
                });
        }

        // ---- Central panel: chart + results table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            chart::catalog_chart(ui, &self.state);
            if self.state.dataset.is_some() {
                ui.separator();
                table::results_table(ui, &self.state);
            }
        });
    }
}
