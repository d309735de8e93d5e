use crate::data::model::{Dataset, FilterCriteria, Technology};
use crate::data::query::filter_rows;
use crate::geo::MunicipalityShape;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which tab is shown in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Charts,
    Map,
}

/// The full UI state, independent of rendering. All filter state is explicit
/// here; there are no globals and no hidden session state.
pub struct AppState {
    /// Loaded dataset (None until the user opens a CSV).
    pub dataset: Option<Dataset>,

    /// Current filter selection; recreated on every interaction.
    pub criteria: FilterCriteria,

    /// Technology shown in the charts tab.
    pub technology: Technology,

    /// Technology shown in the map tab.
    pub map_technology: Technology,

    /// Indices of rows passing the current criteria (rebuilt on change).
    pub visible_indices: Vec<usize>,

    /// Raw GeoJSON text, kept so shapes can be re-derived when the map
    /// department changes.
    pub geojson_text: Option<String>,

    /// Municipality outlines of the selected map department.
    pub shapes: Vec<MunicipalityShape>,

    /// Department whose municipalities the map shows.
    pub map_department: String,

    /// Active central-panel tab.
    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            criteria: FilterCriteria::default(),
            technology: Technology::G4,
            map_technology: Technology::G4,
            visible_indices: Vec::new(),
            geojson_text: None,
            shapes: Vec::new(),
            map_department: String::new(),
            tab: Tab::Charts,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and initialise the criteria to the
    /// first year/quarter present.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let year = dataset.years().next().unwrap_or_default();
        let quarter = dataset.quarters_for(year).next().unwrap_or(1);
        self.criteria = FilterCriteria {
            year,
            quarter,
            departments: Default::default(),
        };
        if self.map_department.is_empty() {
            if let Some(dep) = dataset.departments_for(year, quarter).next() {
                self.map_department = dep.to_string();
            }
        }
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
        self.reparse_shapes();
    }

    /// Store uploaded GeoJSON text and derive the shapes for the current
    /// map department.
    pub fn set_geojson(&mut self, text: String) {
        self.geojson_text = Some(text);
        self.reparse_shapes();
    }

    /// Recompute `visible_indices` after a criteria change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filter_rows(ds, &self.criteria);
        } else {
            self.visible_indices.clear();
        }
    }

    /// Change the selected year; the quarter snaps to the first one present
    /// for that year and the department selection is reset.
    pub fn set_year(&mut self, year: i32) {
        self.criteria.year = year;
        if let Some(ds) = &self.dataset {
            self.criteria.quarter = ds.quarters_for(year).next().unwrap_or(1);
        }
        self.criteria.departments.clear();
        self.refilter();
    }

    /// Change the selected quarter, resetting the department selection.
    pub fn set_quarter(&mut self, quarter: u8) {
        self.criteria.quarter = quarter;
        self.criteria.departments.clear();
        self.refilter();
    }

    /// Toggle one department in the multi-select.
    pub fn toggle_department(&mut self, department: &str) {
        if !self.criteria.departments.remove(department) {
            self.criteria.departments.insert(department.to_string());
        }
        self.refilter();
    }

    /// Change the department the map shows and re-derive its shapes.
    pub fn set_map_department(&mut self, department: String) {
        self.map_department = department;
        self.reparse_shapes();
    }

    fn reparse_shapes(&mut self) {
        self.shapes.clear();
        let Some(text) = &self.geojson_text else {
            return;
        };
        if self.map_department.is_empty() {
            return;
        }
        match crate::geo::parse_geojson(text, &self.map_department) {
            Ok(shapes) => {
                log::info!(
                    "{} municipality shapes for {}",
                    shapes.len(),
                    self.map_department
                );
                self.shapes = shapes;
            }
            Err(e) => {
                log::error!("Failed to parse GeoJSON: {e:#}");
                self.status_message = Some(format!("GeoJSON error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Coverage, Row};

    fn row(year: i32, quarter: u8, department: &str) -> Row {
        Row {
            year,
            quarter,
            provider: "OP".into(),
            department_code: "05".into(),
            department: department.into(),
            municipality_code: "05001".into(),
            municipality: "Medellín".into(),
            municipal_seat: "Medellín".into(),
            populated_center_code: "05001000".into(),
            populated_center: "Centro".into(),
            coverage: Coverage::default(),
        }
    }

    #[test]
    fn set_dataset_initialises_criteria_from_the_data() {
        let mut state = AppState::default();
        state.set_dataset(Dataset::from_rows(vec![
            row(2023, 3, "ANTIOQUIA"),
            row(2022, 1, "ANTIOQUIA"),
        ]));

        assert_eq!(state.criteria.year, 2022);
        assert_eq!(state.criteria.quarter, 1);
        assert_eq!(state.visible_indices, vec![1]);
        assert_eq!(state.map_department, "ANTIOQUIA");
    }

    #[test]
    fn changing_year_snaps_quarter_and_clears_departments() {
        let mut state = AppState::default();
        state.set_dataset(Dataset::from_rows(vec![
            row(2022, 1, "ANTIOQUIA"),
            row(2023, 3, "CALDAS"),
        ]));
        state.toggle_department("ANTIOQUIA");
        assert_eq!(state.visible_indices, vec![0]);

        state.set_year(2023);
        assert_eq!(state.criteria.quarter, 3);
        assert!(state.criteria.departments.is_empty());
        assert_eq!(state.visible_indices, vec![1]);
    }
}
