use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Technology – the six coverage columns of the source CSV
// ---------------------------------------------------------------------------

/// A mobile-network technology generation, one per coverage column.
///
/// The set is closed: the presentation layer only ever asks for columns it
/// enumerated here, and anything outside the list is rejected at the pipeline
/// boundary with [`QueryError::InvalidColumn`](super::query::QueryError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Technology {
    G2,
    G3,
    HspaPlus,
    G4,
    Lte,
    G5,
}

impl Technology {
    /// All technologies in source-CSV column order.
    pub const ALL: [Technology; 6] = [
        Technology::G2,
        Technology::G3,
        Technology::HspaPlus,
        Technology::G4,
        Technology::Lte,
        Technology::G5,
    ];

    /// The CSV column name for this technology.
    pub fn column_name(self) -> &'static str {
        match self {
            Technology::G2 => "COBERTURA_2G",
            Technology::G3 => "COBERTURA_3G",
            Technology::HspaPlus => "COBERTURA_HSPA+",
            Technology::G4 => "COBERTURA_4G",
            Technology::Lte => "COBERTURA_LTE",
            Technology::G5 => "COBERTURA_5G",
        }
    }

    /// Short label for UI widgets.
    pub fn label(self) -> &'static str {
        match self {
            Technology::G2 => "2G",
            Technology::G3 => "3G",
            Technology::HspaPlus => "HSPA+",
            Technology::G4 => "4G",
            Technology::Lte => "LTE",
            Technology::G5 => "5G",
        }
    }

    /// Resolve a CSV column name (or short label) to a technology.
    pub fn from_column_name(name: &str) -> Option<Technology> {
        Technology::ALL
            .into_iter()
            .find(|t| t.column_name() == name || t.label() == name)
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Coverage – the six boolean flags of one row
// ---------------------------------------------------------------------------

/// Per-row coverage flags, parsed from the "S"/"N" markers of the CSV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coverage {
    pub g2: bool,
    pub g3: bool,
    pub hspa_plus: bool,
    pub g4: bool,
    pub lte: bool,
    pub g5: bool,
}

impl Coverage {
    /// Whether the given technology is available at this row's location.
    pub fn has(&self, tech: Technology) -> bool {
        match tech {
            Technology::G2 => self.g2,
            Technology::G3 => self.g3,
            Technology::HspaPlus => self.hspa_plus,
            Technology::G4 => self.g4,
            Technology::Lte => self.lte,
            Technology::G5 => self.g5,
        }
    }
}

// ---------------------------------------------------------------------------
// Row – one record of the coverage CSV
// ---------------------------------------------------------------------------

/// A single record of the fixed 16-column coverage CSV.
#[derive(Debug, Clone)]
pub struct Row {
    pub year: i32,
    /// Quarter of the year, 1–4.
    pub quarter: u8,
    pub provider: String,
    pub department_code: String,
    pub department: String,
    pub municipality_code: String,
    pub municipality: String,
    /// Name of the municipal seat (cabecera municipal).
    pub municipal_seat: String,
    pub populated_center_code: String,
    pub populated_center: String,
    pub coverage: Coverage,
}

// ---------------------------------------------------------------------------
// FilterCriteria – what the user selected in the side panel
// ---------------------------------------------------------------------------

/// Explicit filter selection, passed into the pipeline on every interaction.
/// An empty `departments` set means "no department restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub year: i32,
    pub quarter: u8,
    pub departments: BTreeSet<String>,
}

impl FilterCriteria {
    /// Whether a row matches: year and quarter exactly, and department in the
    /// selected set when that set is non-empty.
    pub fn matches(&self, row: &Row) -> bool {
        row.year == self.year
            && row.quarter == self.quarter
            && (self.departments.is_empty() || self.departments.contains(&row.department))
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded CSV
// ---------------------------------------------------------------------------

/// The full loaded dataset plus the distinct-value indices the UI selectors
/// need. Immutable once constructed; filtering only produces index lists.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All records, in file order.
    pub rows: Vec<Row>,
    /// Sorted distinct years.
    years: BTreeSet<i32>,
    /// Distinct quarters per year.
    quarters: BTreeMap<i32, BTreeSet<u8>>,
    /// Distinct departments per (year, quarter).
    departments: BTreeMap<(i32, u8), BTreeSet<String>>,
}

impl Dataset {
    /// Build the selector indices from the loaded rows.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut years = BTreeSet::new();
        let mut quarters: BTreeMap<i32, BTreeSet<u8>> = BTreeMap::new();
        let mut departments: BTreeMap<(i32, u8), BTreeSet<String>> = BTreeMap::new();

        for row in &rows {
            years.insert(row.year);
            quarters.entry(row.year).or_default().insert(row.quarter);
            departments
                .entry((row.year, row.quarter))
                .or_default()
                .insert(row.department.clone());
        }

        Dataset {
            rows,
            years,
            quarters,
            departments,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted distinct years.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.iter().copied()
    }

    /// Sorted distinct quarters present for a year.
    pub fn quarters_for(&self, year: i32) -> impl Iterator<Item = u8> + '_ {
        self.quarters
            .get(&year)
            .into_iter()
            .flat_map(|qs| qs.iter().copied())
    }

    /// Sorted distinct departments present for a (year, quarter).
    pub fn departments_for(&self, year: i32, quarter: u8) -> impl Iterator<Item = &str> {
        self.departments
            .get(&(year, quarter))
            .into_iter()
            .flat_map(|ds| ds.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn selector_indices_follow_the_rows() {
        let ds = Dataset::from_rows(vec![
            row(2022, 4, "ANTIOQUIA"),
            row(2023, 3, "ANTIOQUIA"),
            row(2023, 3, "CALDAS"),
            row(2023, 2, "ANTIOQUIA"),
        ]);

        assert_eq!(ds.years().collect::<Vec<_>>(), vec![2022, 2023]);
        assert_eq!(ds.quarters_for(2023).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(
            ds.departments_for(2023, 3).collect::<Vec<_>>(),
            vec!["ANTIOQUIA", "CALDAS"]
        );
        assert_eq!(ds.quarters_for(2019).count(), 0);
    }

    #[test]
    fn criteria_with_empty_departments_matches_any_department() {
        let criteria = FilterCriteria {
            year: 2023,
            quarter: 3,
            departments: BTreeSet::new(),
        };
        assert!(criteria.matches(&row(2023, 3, "CALDAS")));
        assert!(!criteria.matches(&row(2023, 2, "CALDAS")));
    }

    #[test]
    fn technology_column_lookup_is_closed() {
        assert_eq!(
            Technology::from_column_name("COBERTURA_HSPA+"),
            Some(Technology::HspaPlus)
        );
        assert_eq!(Technology::from_column_name("5G"), Some(Technology::G5));
        assert_eq!(Technology::from_column_name("COBERTURA_6G"), None);
    }
}
