use std::path::Path;

use anyhow::{bail, Context, Result};

use super::model::{Coverage, Dataset, Row};

// ---------------------------------------------------------------------------
// CSV loader – fixed 16-column coverage schema
// ---------------------------------------------------------------------------

/// Number of columns in the source schema.
const EXPECTED_COLUMNS: usize = 16;

/// Canonical column names, in file order. The source files vary in header
/// spelling, so columns are assigned by POSITION and the header row is only
/// checked for width.
pub const COLUMN_NAMES: [&str; EXPECTED_COLUMNS] = [
    "AÑO",
    "TRIMESTRE",
    "PROVEEDOR",
    "COD_DEPARTAMENTO",
    "DEPARTAMENTO",
    "COD_MUNICIPIO",
    "MUNICIPIO",
    "CABECERA_MUNICIPAL",
    "COD_CENTRO_POBLADO",
    "CENTRO_POBLADO",
    "COBERTURA_2G",
    "COBERTURA_3G",
    "COBERTURA_HSPA+",
    "COBERTURA_4G",
    "COBERTURA_LTE",
    "COBERTURA_5G",
];

/// Load a coverage dataset from a CSV file.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;

    let headers = reader.headers().context("reading CSV headers")?;
    if headers.len() != EXPECTED_COLUMNS {
        bail!(
            "CSV has {} columns, expected {EXPECTED_COLUMNS}",
            headers.len()
        );
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(parse_record(&record).with_context(|| format!("CSV row {row_no}"))?);
    }

    Ok(Dataset::from_rows(rows))
}

fn parse_record(record: &csv::StringRecord) -> Result<Row> {
    if record.len() != EXPECTED_COLUMNS {
        bail!("{} fields, expected {EXPECTED_COLUMNS}", record.len());
    }
    let field = |i: usize| record.get(i).unwrap_or("").trim();

    let year: i32 = field(0)
        .parse()
        .with_context(|| format!("'{}' is not a valid year", field(0)))?;
    let quarter: u8 = field(1)
        .parse()
        .with_context(|| format!("'{}' is not a valid quarter", field(1)))?;
    if !(1..=4).contains(&quarter) {
        bail!("quarter {quarter} outside 1-4");
    }

    Ok(Row {
        year,
        quarter,
        provider: field(2).to_string(),
        department_code: field(3).to_string(),
        department: field(4).to_string(),
        municipality_code: field(5).to_string(),
        municipality: field(6).to_string(),
        municipal_seat: field(7).to_string(),
        populated_center_code: field(8).to_string(),
        populated_center: field(9).to_string(),
        coverage: Coverage {
            g2: parse_flag(field(10), COLUMN_NAMES[10])?,
            g3: parse_flag(field(11), COLUMN_NAMES[11])?,
            hspa_plus: parse_flag(field(12), COLUMN_NAMES[12])?,
            g4: parse_flag(field(13), COLUMN_NAMES[13])?,
            lte: parse_flag(field(14), COLUMN_NAMES[14])?,
            g5: parse_flag(field(15), COLUMN_NAMES[15])?,
        },
    })
}

/// Parse an "S"/"N" coverage marker, case-insensitively.
fn parse_flag(s: &str, column: &str) -> Result<bool> {
    match s {
        "S" | "s" => Ok(true),
        "N" | "n" => Ok(false),
        other => bail!("{column}: '{other}' is not a coverage marker (S/N)"),
    }
}
