use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Technology;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone the selector values so we can mutate state inside the widgets.
    let years: Vec<i32> = dataset.years().collect();
    let quarters: Vec<u8> = dataset.quarters_for(state.criteria.year).collect();
    let departments: Vec<String> = dataset
        .departments_for(state.criteria.year, state.criteria.quarter)
        .map(str::to_string)
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year ----
            ui.strong("Year");
            let current_year = state.criteria.year;
            egui::ComboBox::from_id_salt("year")
                .selected_text(current_year.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for year in &years {
                        if ui
                            .selectable_label(current_year == *year, year.to_string())
                            .clicked()
                        {
                            state.set_year(*year);
                        }
                    }
                });

            // ---- Quarter (restricted to those present for the year) ----
            ui.strong("Quarter");
            let current_quarter = state.criteria.quarter;
            egui::ComboBox::from_id_salt("quarter")
                .selected_text(format!("Q{current_quarter}"))
                .show_ui(ui, |ui: &mut Ui| {
                    for q in &quarters {
                        if ui
                            .selectable_label(current_quarter == *q, format!("Q{q}"))
                            .clicked()
                        {
                            state.set_quarter(*q);
                        }
                    }
                });

            // ---- Technology ----
            ui.strong("Technology");
            egui::ComboBox::from_id_salt("technology")
                .selected_text(state.technology.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for tech in Technology::ALL {
                        if ui
                            .selectable_label(state.technology == tech, tech.label())
                            .clicked()
                        {
                            state.technology = tech;
                        }
                    }
                });
            ui.separator();

            // ---- Department multi-select ----
            let n_selected = state.criteria.departments.len();
            let header = if n_selected == 0 {
                format!("Departments (all {})", departments.len())
            } else {
                format!("Departments ({n_selected}/{})", departments.len())
            };
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("departments")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.small("No selection = no restriction");
                    if ui.small_button("Clear").clicked() {
                        state.criteria.departments.clear();
                        state.refilter();
                    }
                    for dep in &departments {
                        let mut checked = state.criteria.departments.contains(dep);
                        if ui.checkbox(&mut checked, dep).changed() {
                            state.toggle_department(dep);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar with the tab switcher.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_csv_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open GeoJSON…").clicked() {
                open_geojson_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if ui
            .selectable_label(state.tab == Tab::Charts, "Coverage charts")
            .clicked()
        {
            state.tab = Tab::Charts;
        }
        if ui
            .selectable_label(state.tab == Tab::Map, "Coverage map")
            .clicked()
        {
            state.tab = Tab::Map;
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} match the filters",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Filtered-rows table
// ---------------------------------------------------------------------------

/// Render the filtered rows, virtualised so large files stay responsive.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    let flag = |b: bool| if b { "S" } else { "N" };

    // All 16 source columns, in file order.
    let titles = [
        "Year",
        "Q",
        "Provider",
        "Dept. code",
        "Department",
        "Mun. code",
        "Municipality",
        "Municipal seat",
        "Centre code",
        "Populated centre",
    ];

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto(), titles.len() - 1)
        .column(Column::remainder())
        .columns(Column::auto(), Technology::ALL.len())
        .header(18.0, |mut header| {
            for title in titles {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
            for tech in Technology::ALL {
                header.col(|ui| {
                    ui.strong(tech.label());
                });
            }
        })
        .body(|body| {
            body.rows(16.0, state.visible_indices.len(), |mut table_row| {
                let row = &dataset.rows[state.visible_indices[table_row.index()]];
                table_row.col(|ui| {
                    ui.label(row.year.to_string());
                });
                table_row.col(|ui| {
                    ui.label(row.quarter.to_string());
                });
                for text in [
                    &row.provider,
                    &row.department_code,
                    &row.department,
                    &row.municipality_code,
                    &row.municipality,
                    &row.municipal_seat,
                    &row.populated_center_code,
                    &row.populated_center,
                ] {
                    table_row.col(|ui| {
                        ui.label(text);
                    });
                }
                for tech in Technology::ALL {
                    table_row.col(|ui| {
                        ui.label(flag(row.coverage.has(tech)));
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_csv_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open coverage data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_csv(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows, years {:?}",
                    dataset.len(),
                    dataset.years().collect::<Vec<_>>()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load CSV: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn open_geojson_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open municipality boundaries")
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file();

    if let Some(path) = file {
        match std::fs::read_to_string(&path) {
            Ok(text) => state.set_geojson(text),
            Err(e) => {
                log::error!("Failed to read GeoJSON: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
