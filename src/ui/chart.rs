use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Plot, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Catalog chart (central panel)
// ---------------------------------------------------------------------------

/// Scatter of matching plots: total area (ft²) against rate, coloured by
/// status.
pub fn catalog_chart(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a catalog to browse plots  (File → Open…)");
            });
            return;
        }
    };

    if dataset.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("The catalog has no plots.");
        });
        return;
    }

    Plot::new("catalog_chart")
        .legend(Legend::default())
        .x_axis_label("Total plot area (ft²)")
        .y_axis_label("Rate (₹)")
        .height(240.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for &idx in &state.visible_indices {
                let plot = &dataset.plots[idx];
                let (Some(area), Some(rate)) = (plot.total_area_sqft, plot.rate) else {
                    continue;
                };

                let color = state
                    .status_colors
                    .as_ref()
                    .map(|colors| colors.color_for(&plot.status))
                    .unwrap_or(Color32::LIGHT_BLUE);

                // One legend entry per status value.
                let status = plot.status.trim();
                let name = if status.is_empty() { "unknown" } else { status };

                let points = Points::new(vec![[area, rate]])
                    .name(name)
                    .color(color)
                    .radius(3.0);

                plot_ui.points(points);
            }
        });
}
