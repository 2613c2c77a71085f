use eframe::egui::{Color32, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::derive::{format_area, format_currency};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Results table (central panel)
// ---------------------------------------------------------------------------

const HEADERS: [&str; 7] = [
    "NO",
    "Net (ft²)",
    "Built up (ft²)",
    "Total (ft²)",
    "Rate (₹)",
    "9% off (₹)",
    "Status",
];

/// Table of the plots passing the current filters, in source order.
pub fn results_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto())
        .columns(Column::remainder(), HEADERS.len() - 1)
        .header(20.0, |mut header| {
            for name in HEADERS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let plot = &dataset.plots[state.visible_indices[row.index()]];
                row.col(|ui| {
                    ui.label(&plot.id);
                });
                row.col(|ui| {
                    ui.label(format_area(plot.net_area_sqft));
                });
                row.col(|ui| {
                    ui.label(format_area(plot.built_area_sqft));
                });
                row.col(|ui| {
                    ui.label(format_area(plot.total_area_sqft));
                });
                row.col(|ui| {
                    ui.label(format_currency(plot.rate));
                });
                row.col(|ui| {
                    ui.label(format_currency(plot.discounted_rate));
                });
                row.col(|ui| {
                    let color = state
                        .status_colors
                        .as_ref()
                        .map(|colors| colors.color_for(&plot.status))
                        .unwrap_or(Color32::GRAY);
                    ui.colored_label(color, &plot.status);
                });
            });
        });
}
