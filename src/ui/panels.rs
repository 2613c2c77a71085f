use anyhow::Context;
use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use crate::data::derive::{AreaBreakdown, derive_detail, format_area, format_currency};
use crate::data::export;
use crate::data::filter::FilterField;
use crate::state::{AppState, Source};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            ui.menu_button("Open URL…", |ui: &mut Ui| {
                ui.text_edit_singleline(&mut state.url_input);
                if ui.button("Load").clicked() {
                    let url = state.url_input.trim().to_string();
                    if !url.is_empty() {
                        load_source(state, Source::Url(url));
                    }
                    ui.close_menu();
                }
            });
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                if let Err(e) = state.reload_current() {
                    log::error!("reload failed: {e}");
                    state.status_message = Some(format!("Error: {e}"));
                }
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Export matches…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} plot(s) loaded, {} match your criteria",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filters + plot lookup
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No catalog loaded.");
        return;
    }

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in FilterField::ALL {
                let control = state.filters.get_mut(field);
                changed |= ui.checkbox(&mut control.enabled, field.label()).changed();
                if control.enabled {
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("Min");
                        changed |= ui.add(drag_value(&mut control.min, field)).changed();
                        ui.label("Max");
                        changed |= ui.add(drag_value(&mut control.max, field)).changed();
                    });
                }
                ui.add_space(4.0);
            }

            // An invalid range disables only its own filter; say why.
            for warning in &state.warnings {
                ui.label(RichText::new(format!("⚠ {warning}")).color(Color32::YELLOW));
            }

            ui.separator();
            lookup_section(ui, state);
        });

    if changed {
        state.refilter();
    }
}

fn drag_value(value: &mut f64, field: FilterField) -> DragValue<'_> {
    let speed = match field {
        FilterField::Budget => 10_000.0,
        _ => 10.0,
    };
    DragValue::new(value).speed(speed).range(0.0..=f64::MAX)
}

/// Plot-number multiselect; the detail panel follows the selection.
fn lookup_section(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let plot_ids = dataset.plot_ids.clone();

    let n_selected = state.selected_ids.len();
    let header_text = format!("Plot details  ({n_selected}/{})", plot_ids.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("plot_lookup")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all();
                }
                if ui.small_button("None").clicked() {
                    state.select_none();
                }
            });

            for id in &plot_ids {
                let mut checked = state.selected_ids.contains(id);
                if ui.checkbox(&mut checked, id.as_str()).changed() {
                    state.toggle_selected(id);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Right side panel – per-plot detail cards
// ---------------------------------------------------------------------------

/// Area and pricing breakdown for every selected plot.
pub fn detail_panel(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    ui.heading("Plot details");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for &idx in &state.detail_indices {
                let detail = derive_detail(&dataset.plots[idx]);

                ui.strong(format!("Plot NO: {}", detail.id));
                ui.label(format!("Status: {}", detail.status));
                ui.add_space(4.0);

                ui.columns(3, |cols: &mut [Ui]| {
                    area_column(&mut cols[0], "Net Plot Area", &detail.net);
                    area_column(&mut cols[1], "Built Up Area", &detail.built_up);
                    area_column(&mut cols[2], "Total Plot Area", &detail.total);
                });

                ui.add_space(4.0);
                ui.label(format!("Rate: {}", format_currency(detail.rate)));
                ui.label(format!(
                    "9% discounted: {}",
                    format_currency(detail.discounted_rate)
                ));
                ui.separator();
            }
        });
}

fn area_column(ui: &mut Ui, title: &str, area: &AreaBreakdown) {
    ui.strong(title);
    ui.label(format!("SQ.MTR: {}", format_area(area.sqmt)));
    ui.label(format!("SQ.YDS: {}", format_area(area.sqyd)));
    ui.label(format!("SQ.FEET: {}", format_area(area.sqft)));
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open plot catalog")
        .add_filter("Supported files", &["csv", "json", "xlsx", "xlsm", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls"])
        .pick_file();

    if let Some(path) = file {
        load_source(state, Source::Path(path));
    }
}

fn load_source(state: &mut AppState, source: Source) {
    match state.load_source(source) {
        Ok(()) => {
            if let Some(ds) = &state.dataset {
                log::info!(
                    "catalog ready: {} plot(s), {} unique id(s)",
                    ds.len(),
                    ds.plot_ids.len()
                );
            }
        }
        Err(e) => {
            log::error!("failed to load catalog: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}

fn export_dialog(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export matching plots")
        .add_filter("Excel workbook", &["xlsx"])
        .add_filter("CSV", &["csv"])
        .set_file_name("plots.xlsx")
        .save_file()
    else {
        return;
    };

    if let Err(e) = write_export(state, &path) {
        log::error!("export failed: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}

/// Render the current matches to the chosen format and write them out.
fn write_export(state: &AppState, path: &std::path::Path) -> anyhow::Result<()> {
    let dataset = state.dataset.as_ref().context("no catalog loaded")?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let bytes = match ext.as_str() {
        "csv" => export::to_csv(dataset, &state.visible_indices)?,
        _ => export::to_xlsx(dataset, &state.visible_indices)?,
    };
    std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;

    log::info!(
        "exported {} plot(s) to {}",
        state.visible_indices.len(),
        path.display()
    );
    Ok(())
}
