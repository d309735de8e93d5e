use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{map, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct CobermapApp {
    pub state: AppState,
}

impl eframe::App for CobermapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and tab switcher ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Charts => {
                // Filtered rows on top, bar chart below.
                egui::TopBottomPanel::top("data_table")
                    .resizable(true)
                    .default_height(ui.available_height() * 0.4)
                    .show_inside(ui, |ui| {
                        panels::data_table(ui, &self.state);
                    });
                egui::CentralPanel::default().show_inside(ui, |ui| {
                    plot::coverage_bar_chart(ui, &self.state);
                });
            }
            Tab::Map => {
                map::choropleth(ui, &mut self.state);
            }
        });
    }
}
