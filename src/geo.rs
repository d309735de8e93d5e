use anyhow::{Context, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// GeoJSON → municipality shapes
// ---------------------------------------------------------------------------
//
// The choropleth consumes a DANE-style GeoJSON where each feature carries
// `properties.DEPTO` (department name) and `properties.MPIO_CNMBR`
// (municipality name). Only the outer rings are kept; egui_plot fills
// polygons without hole support anyway.

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    /// `properties` may be absent or an explicit JSON null.
    properties: Option<Properties>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(rename = "DEPTO")]
    department: Option<String>,
    #[serde(rename = "MPIO_CNMBR")]
    municipality: Option<String>,
}

/// GeoJSON positions may carry an altitude, so a position is a `Vec<f64>`
/// rather than a fixed pair.
type Ring = Vec<Vec<f64>>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Unsupported,
}

/// One municipality outline, ready for plotting.
#[derive(Debug, Clone)]
pub struct MunicipalityShape {
    /// Municipality name, the join key against the aggregation results.
    pub name: String,
    /// Outer rings as (longitude, latitude) pairs. MultiPolygons contribute
    /// one ring per part.
    pub rings: Vec<Vec<[f64; 2]>>,
}

/// Parse a GeoJSON FeatureCollection and keep the municipalities of the
/// given department.
///
/// Features without a usable name, geometry, or matching department are
/// skipped (with a warning for the malformed ones) rather than failing the
/// whole file.
pub fn parse_geojson(text: &str, department: &str) -> Result<Vec<MunicipalityShape>> {
    let collection: FeatureCollection =
        serde_json::from_str(text).context("parsing GeoJSON FeatureCollection")?;

    let mut shapes = Vec::new();
    for feature in collection.features {
        let props = feature.properties.unwrap_or_default();
        if props.department.as_deref() != Some(department) {
            continue;
        }
        let Some(name) = props.municipality else {
            log::warn!("GeoJSON feature without MPIO_CNMBR, skipping");
            continue;
        };
        let rings = match feature.geometry {
            Some(Geometry::Polygon { coordinates }) => outer_rings(vec![coordinates]),
            Some(Geometry::MultiPolygon { coordinates }) => outer_rings(coordinates),
            Some(Geometry::Unsupported) | None => {
                log::warn!("GeoJSON feature '{name}' has no polygon geometry, skipping");
                continue;
            }
        };
        if rings.is_empty() {
            log::warn!("GeoJSON feature '{name}' has no usable rings, skipping");
            continue;
        }
        shapes.push(MunicipalityShape { name, rings });
    }

    Ok(shapes)
}

/// Keep the first (outer) ring of every polygon part, dropping positions
/// that are not at least (lon, lat).
fn outer_rings(polygons: Vec<Vec<Ring>>) -> Vec<Vec<[f64; 2]>> {
    polygons
        .into_iter()
        .filter_map(|mut rings| {
            if rings.is_empty() {
                return None;
            }
            let outer = rings.swap_remove(0);
            let ring: Vec<[f64; 2]> = outer
                .into_iter()
                .filter(|pos| pos.len() >= 2)
                .map(|pos| [pos[0], pos[1]])
                .collect();
            (ring.len() >= 3).then_some(ring)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "properties": {"DEPTO": "ANTIOQUIA", "MPIO_CNMBR": "MEDELLÍN"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-75.6, 6.2], [-75.5, 6.2], [-75.5, 6.3], [-75.6, 6.2]]]
                }
            },
            {
                "properties": {"DEPTO": "ANTIOQUIA", "MPIO_CNMBR": "ENVIGADO"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-75.6, 6.1], [-75.5, 6.1], [-75.5, 6.2], [-75.6, 6.1]],
                         [[-75.58, 6.12], [-75.56, 6.12], [-75.56, 6.14], [-75.58, 6.12]]],
                        [[[-75.7, 6.0], [-75.6, 6.0], [-75.6, 6.1], [-75.7, 6.0]]]
                    ]
                }
            },
            {
                "properties": {"DEPTO": "CALDAS", "MPIO_CNMBR": "MANIZALES"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-75.5, 5.0], [-75.4, 5.0], [-75.4, 5.1], [-75.5, 5.0]]]
                }
            },
            {
                "properties": {"DEPTO": "ANTIOQUIA"},
                "geometry": {"type": "Point", "coordinates": [-75.5, 6.2]}
            }
        ]
    }"#;

    #[test]
    fn keeps_only_the_selected_department() {
        let shapes = parse_geojson(SAMPLE, "ANTIOQUIA").unwrap();
        let names: Vec<&str> = shapes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["MEDELLÍN", "ENVIGADO"]);

        let caldas = parse_geojson(SAMPLE, "CALDAS").unwrap();
        assert_eq!(caldas.len(), 1);
    }

    #[test]
    fn multipolygon_keeps_one_outer_ring_per_part() {
        let shapes = parse_geojson(SAMPLE, "ANTIOQUIA").unwrap();
        let envigado = shapes.iter().find(|s| s.name == "ENVIGADO").unwrap();
        // Two parts, inner ring of the first part dropped.
        assert_eq!(envigado.rings.len(), 2);
        assert_eq!(envigado.rings[0][0], [-75.6, 6.1]);
    }

    #[test]
    fn malformed_input_is_an_error_but_odd_features_are_skipped() {
        assert!(parse_geojson("not json", "ANTIOQUIA").is_err());
        assert!(parse_geojson(r#"{"type": "FeatureCollection"}"#, "X").is_err());

        // The Point feature above is skipped silently, not fatal.
        let shapes = parse_geojson(SAMPLE, "ANTIOQUIA").unwrap();
        assert_eq!(shapes.len(), 2);
    }

    #[test]
    fn three_element_positions_are_accepted() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "properties": {"DEPTO": "ANTIOQUIA", "MPIO_CNMBR": "BELLO"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-75.6, 6.3, 0.0], [-75.5, 6.3, 0.0], [-75.5, 6.4, 0.0]]]
                }
            }]
        }"#;
        let shapes = parse_geojson(text, "ANTIOQUIA").unwrap();
        assert_eq!(shapes[0].rings[0], vec![[-75.6, 6.3], [-75.5, 6.3], [-75.5, 6.4]]);
    }
}
