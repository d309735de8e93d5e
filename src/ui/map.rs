use eframe::egui::{self, Stroke, Ui};
use egui_plot::{Plot, PlotPoints, Polygon};

use crate::color::ColorRamp;
use crate::data::model::{FilterCriteria, Technology};
use crate::data::query::{percentage_by_municipality, resolve_column};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Choropleth map (map tab)
// ---------------------------------------------------------------------------

/// Render the choropleth of coverage percentage per municipality.
pub fn choropleth(ui: &mut Ui, state: &mut AppState) {
    // ---- Map controls ----
    // The department list is collected up front so the dataset borrow does
    // not overlap the state mutations the widgets below perform.
    let departments: Vec<String> = match &state.dataset {
        Some(ds) => ds
            .departments_for(state.criteria.year, state.criteria.quarter)
            .map(str::to_string)
            .collect(),
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a coverage CSV to begin  (File → Open CSV…)");
            });
            return;
        }
    };

    let mut new_department: Option<String> = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Department");
        egui::ComboBox::from_id_salt("map_department")
            .selected_text(&state.map_department)
            .show_ui(ui, |ui: &mut Ui| {
                for dep in &departments {
                    if ui
                        .selectable_label(state.map_department == *dep, dep)
                        .clicked()
                    {
                        new_department = Some(dep.clone());
                    }
                }
            });

        // The map combo shows the raw column names, as the source data does;
        // the clicked name goes through the validated pipeline boundary.
        ui.strong("Technology");
        egui::ComboBox::from_id_salt("map_technology")
            .selected_text(state.map_technology.column_name())
            .show_ui(ui, |ui: &mut Ui| {
                for tech in Technology::ALL {
                    let name = tech.column_name();
                    if ui
                        .selectable_label(state.map_technology == tech, name)
                        .clicked()
                    {
                        match resolve_column(name) {
                            Ok(t) => state.map_technology = t,
                            Err(e) => {
                                log::error!("{e}");
                                state.status_message = Some(e.to_string());
                            }
                        }
                    }
                }
            });
    });
    if let Some(dep) = new_department {
        state.set_map_department(dep);
    }

    if state.geojson_text.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a GeoJSON file to see the map  (File → Open GeoJSON…)");
        });
        return;
    }
    if state.shapes.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(format!(
                "The GeoJSON has no municipalities for {}.",
                state.map_department
            ));
        });
        return;
    }

    let Some(dataset) = &state.dataset else {
        return;
    };

    // Percentages follow the user-selected year/quarter, restricted to the
    // department the map shows.
    let criteria = FilterCriteria {
        year: state.criteria.year,
        quarter: state.criteria.quarter,
        departments: std::iter::once(state.map_department.clone()).collect(),
    };
    let percentages = percentage_by_municipality(dataset, state.map_technology, &criteria);

    // Shape names are upper-case in DANE files while the CSV mixes cases,
    // so the join is case-folded.
    let by_folded: std::collections::BTreeMap<String, f64> = percentages
        .iter()
        .map(|(name, &pct)| (name.to_uppercase(), pct))
        .collect();

    let ramp = ColorRamp::from_values(percentages.values());

    Plot::new("coverage_map")
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for shape in &state.shapes {
                let pct = by_folded.get(&shape.name.to_uppercase()).copied();
                let (fill, label) = match pct {
                    Some(p) => (
                        ramp.color_for(p),
                        format!("{}: {p:.1}% {}", shape.name, state.map_technology),
                    ),
                    None => (ramp.missing(), format!("{}: no data", shape.name)),
                };

                for ring in &shape.rings {
                    let points: PlotPoints = ring.iter().map(|&[x, y]| [x, y]).collect();
                    plot_ui.polygon(
                        Polygon::new(points)
                            .name(&label)
                            .fill_color(fill.gamma_multiply(0.7))
                            .stroke(Stroke::new(1.0, fill)),
                    );
                }
            }
        });
}
