use std::collections::BTreeMap;

use thiserror::Error;

use super::model::{Dataset, FilterCriteria, Technology};

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// Caller-correctable errors of the filter-aggregate pipeline.
///
/// An empty filter result is deliberately NOT an error: the UI shows a
/// warning and renders nothing. Only requests the presentation layer could
/// have avoided (a column name outside the enumerated set) are typed here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown technology column: {0}")]
    InvalidColumn(String),
}

/// Resolve a technology column name at the pipeline boundary.
pub fn resolve_column(name: &str) -> Result<Technology, QueryError> {
    Technology::from_column_name(name).ok_or_else(|| QueryError::InvalidColumn(name.to_string()))
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of rows matching the criteria: year and quarter exactly,
/// department in the selected set when that set is non-empty.
///
/// Never mutates the dataset; a year/quarter combination absent from the
/// data simply yields an empty list.
pub fn filter_rows(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| criteria.matches(row))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Count rows covered by `tech` per municipality, within the given subset
/// of row indices (as produced by [`filter_rows`]).
pub fn count_by_municipality(
    dataset: &Dataset,
    subset: &[usize],
    tech: Technology,
) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for &idx in subset {
        let row = &dataset.rows[idx];
        if row.coverage.has(tech) {
            *counts.entry(row.municipality.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Percentage of rows covered by `tech` per municipality, within rows
/// matching the criteria.
///
/// Keys are exactly the municipalities present in the matching rows, so the
/// denominator is always at least one and values stay within [0, 100].
pub fn percentage_by_municipality(
    dataset: &Dataset,
    tech: Technology,
    criteria: &FilterCriteria,
) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for row in dataset.rows.iter().filter(|row| criteria.matches(row)) {
        let entry = totals.entry(row.municipality.clone()).or_insert((0, 0));
        entry.1 += 1;
        if row.coverage.has(tech) {
            entry.0 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(municipality, (covered, total))| {
            (municipality, 100.0 * covered as f64 / total as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Coverage, Row};

    fn row(year: i32, quarter: u8, department: &str, municipality: &str, g2: bool) -> Row {
        Row {
            year,
            quarter,
            provider: "OP".into(),
            department_code: "05".into(),
            department: department.into(),
            municipality_code: "05001".into(),
            municipality: municipality.into(),
            municipal_seat: municipality.into(),
            populated_center_code: "05001000".into(),
            populated_center: "Centro".into(),
            coverage: Coverage {
                g2,
                ..Coverage::default()
            },
        }
    }

    fn sample_dataset() -> Dataset {
        Dataset::from_rows(vec![
            row(2023, 3, "ANTIOQUIA", "Medellín", true),
            row(2023, 3, "ANTIOQUIA", "Medellín", false),
            row(2023, 3, "ANTIOQUIA", "Envigado", true),
        ])
    }

    fn criteria(year: i32, quarter: u8, departments: &[&str]) -> FilterCriteria {
        FilterCriteria {
            year,
            quarter,
            departments: departments.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn filter_matches_criteria_exactly_and_is_idempotent() {
        let ds = sample_dataset();
        let c = criteria(2023, 3, &[]);

        let subset = filter_rows(&ds, &c);
        assert_eq!(subset, vec![0, 1, 2]);
        for &idx in &subset {
            assert!(c.matches(&ds.rows[idx]));
        }

        // Re-filtering the filtered rows with the same criteria keeps them all.
        let refiltered: Vec<usize> = subset
            .iter()
            .copied()
            .filter(|&i| c.matches(&ds.rows[i]))
            .collect();
        assert_eq!(refiltered, subset);
    }

    #[test]
    fn department_set_restricts_and_empty_set_does_not() {
        let ds = sample_dataset();
        assert_eq!(filter_rows(&ds, &criteria(2023, 3, &["ANTIOQUIA"])).len(), 3);
        assert_eq!(filter_rows(&ds, &criteria(2023, 3, &["CALDAS"])).len(), 0);
        assert_eq!(filter_rows(&ds, &criteria(2023, 3, &[])).len(), 3);
    }

    #[test]
    fn absent_year_quarter_yields_empty_subset_and_empty_aggregation() {
        let ds = sample_dataset();
        let c = criteria(2021, 1, &[]);

        let subset = filter_rows(&ds, &c);
        assert!(subset.is_empty());

        assert!(count_by_municipality(&ds, &subset, Technology::G2).is_empty());
        assert!(percentage_by_municipality(&ds, Technology::G2, &c).is_empty());
    }

    #[test]
    fn counts_sum_to_covered_rows_in_subset() {
        let ds = sample_dataset();
        let subset = filter_rows(&ds, &criteria(2023, 3, &[]));

        let counts = count_by_municipality(&ds, &subset, Technology::G2);
        assert_eq!(counts.get("Medellín"), Some(&1));
        assert_eq!(counts.get("Envigado"), Some(&1));

        let covered = subset
            .iter()
            .filter(|&&i| ds.rows[i].coverage.has(Technology::G2))
            .count() as u64;
        assert_eq!(counts.values().sum::<u64>(), covered);
    }

    #[test]
    fn count_keys_are_exactly_the_covered_municipalities() {
        let ds = Dataset::from_rows(vec![
            row(2023, 3, "ANTIOQUIA", "Medellín", true),
            row(2023, 3, "ANTIOQUIA", "Itagüí", false),
        ]);
        let subset = filter_rows(&ds, &criteria(2023, 3, &[]));
        let counts = count_by_municipality(&ds, &subset, Technology::G2);
        assert_eq!(counts.keys().collect::<Vec<_>>(), vec!["Medellín"]);
    }

    #[test]
    fn percentages_match_worked_example_and_stay_in_range() {
        let ds = sample_dataset();
        let pct = percentage_by_municipality(&ds, Technology::G2, &criteria(2023, 3, &[]));

        assert_eq!(pct.get("Medellín"), Some(&50.0));
        assert_eq!(pct.get("Envigado"), Some(&100.0));
        assert_eq!(pct.len(), 2);
        for v in pct.values() {
            assert!((0.0..=100.0).contains(v));
        }
    }

    #[test]
    fn percentage_respects_department_restriction() {
        let ds = Dataset::from_rows(vec![
            row(2023, 3, "ANTIOQUIA", "Medellín", true),
            row(2023, 3, "CALDAS", "Manizales", true),
            row(2023, 3, "CALDAS", "Manizales", false),
        ]);

        let pct =
            percentage_by_municipality(&ds, Technology::G2, &criteria(2023, 3, &["CALDAS"]));
        assert_eq!(pct.get("Manizales"), Some(&50.0));
        assert!(!pct.contains_key("Medellín"));
    }

    #[test]
    fn unknown_column_is_rejected_at_the_boundary() {
        assert_eq!(resolve_column("COBERTURA_4G"), Ok(Technology::G4));
        assert_eq!(
            resolve_column("COBERTURA_6G"),
            Err(QueryError::InvalidColumn("COBERTURA_6G".into()))
        );

        // A typed error, not a panic: the message names the bad column.
        let err = resolve_column("SIGNAL").unwrap_err();
        assert_eq!(err.to_string(), "unknown technology column: SIGNAL");
    }
}
