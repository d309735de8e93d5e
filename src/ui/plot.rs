use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Plot};

use crate::color::ColorRamp;
use crate::data::query::count_by_municipality;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Coverage bar chart (charts tab)
// ---------------------------------------------------------------------------

/// Render the per-municipality bar chart of covered populated centres.
pub fn coverage_bar_chart(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a coverage CSV to begin  (File → Open CSV…)");
            });
            return;
        }
    };

    if state.visible_indices.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data for the selected filters.");
        });
        return;
    }

    let counts = count_by_municipality(dataset, &state.visible_indices, state.technology);
    if counts.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(format!(
                "No populated centre has {} coverage under the selected filters.",
                state.technology
            ));
        });
        return;
    }

    let values: Vec<f64> = counts.values().map(|&c| c as f64).collect();
    let ramp = ColorRamp::from_values(&values);

    let municipalities: Vec<String> = counts.keys().cloned().collect();
    let bars: Vec<Bar> = counts
        .values()
        .enumerate()
        .map(|(i, &count)| {
            Bar::new(i as f64, count as f64)
                .name(&municipalities[i])
                .fill(ramp.color_for(count as f64))
        })
        .collect();

    let labels = municipalities.clone();
    Plot::new("coverage_bar_chart")
        .y_axis_label("Populated centres covered")
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round() as i64;
            // Only label actual bar positions.
            if (mark.value - i as f64).abs() > 1e-6 {
                return String::new();
            }
            labels
                .get(usize::try_from(i).unwrap_or(usize::MAX))
                .cloned()
                .unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars).name(format!("{} coverage", state.technology)),
            );
        });
}
