//! Loading survey points from JSON.
//!
//! Two layouts are accepted:
//! - a plain array of records (`{"lat", "lon", "LC1", "SURVEY_DATE"?, "POINT_ID"?}`),
//! - a GeoJSON `FeatureCollection` of `Point` features carrying the same
//!   attributes as properties (an export of the survey asset).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::coords::LatLon;
use crate::error::DatasetError;
use crate::points::GeoPoint;

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Map<String, Value>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// Read and parse a points file.
pub fn load_points(path: &Path) -> Result<Vec<GeoPoint>, DatasetError> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_points(&text)
}

/// Parse either accepted layout. Every coordinate is validated.
pub fn parse_points(json: &str) -> Result<Vec<GeoPoint>, DatasetError> {
    let value: Value = serde_json::from_str(json)?;
    let points = if value.get("features").is_some() {
        let collection: FeatureCollection = serde_json::from_value(value)?;
        collection
            .features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| feature_to_point(index, feature))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        serde_json::from_value::<Vec<GeoPoint>>(value)?
    };

    for (index, point) in points.iter().enumerate() {
        point
            .location
            .validate()
            .map_err(|source| DatasetError::Coordinate { index, source })?;
    }
    Ok(points)
}

fn feature_to_point(index: usize, feature: Feature) -> Result<GeoPoint, DatasetError> {
    let (lon, lat) = match feature.geometry {
        Some(Geometry { kind, coordinates }) if kind == "Point" => match point_position(&coordinates) {
            Some(position) => position,
            None => {
                return Err(DatasetError::Geometry {
                    index,
                    found: format!("Point {coordinates}"),
                })
            }
        },
        Some(Geometry { kind, .. }) => return Err(DatasetError::Geometry { index, found: kind }),
        None => {
            return Err(DatasetError::Geometry {
                index,
                found: "null".to_string(),
            })
        }
    };

    let props = &feature.properties;
    let class_code = props
        .get("LC1")
        .and_then(Value::as_str)
        .ok_or(DatasetError::MissingClass { index })?;

    Ok(GeoPoint {
        id: props.get("POINT_ID").and_then(scalar_to_string),
        location: LatLon::new(lat, lon),
        class_code: class_code.to_string(),
        survey_date: props.get("SURVEY_DATE").and_then(scalar_to_string),
    })
}

/// `[lon, lat, ...]`; a trailing altitude is ignored.
fn point_position(coordinates: &Value) -> Option<(f64, f64)> {
    match coordinates.as_array()?.as_slice() {
        [lon, lat, ..] => Some((lon.as_f64()?, lat.as_f64()?)),
        _ => None,
    }
}

/// Survey exports store ids as numbers or strings.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `deserialize_with` for optional record attributes held as a number or a
/// string. `null` is `None`; arrays, objects and booleans are rejected.
pub(crate) fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(&value).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a number or a string, found {value}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    #[test]
    fn parses_plain_records_with_survey_field_names() {
        let json = r#"[
            {"POINT_ID": "26181784", "lat": 41.902782, "lon": 12.496366, "LC1": "B16", "SURVEY_DATE": "2018-07-02"},
            {"lat": 45.1, "lon": 9.2, "class_code": "C"}
        ]"#;
        let points = parse_points(json).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].id.as_deref(), Some("26181784"));
        assert_eq!(points[0].class_code, "B16");
        assert_eq!(points[0].survey_date.as_deref(), Some("2018-07-02"));
        assert_relative_eq!(points[0].location.lat, 41.902782);
        assert_eq!(points[1].class_code, "C");
    }

    #[test]
    fn plain_records_accept_numeric_point_ids() {
        let json = r#"[
            {"POINT_ID": 26181784, "lat": 41.9, "lon": 12.5, "LC1": "B16"},
            {"POINT_ID": null, "lat": 45.1, "lon": 9.2, "LC1": "C"}
        ]"#;
        let points = parse_points(json).expect("numeric ids must not reject the dataset");
        assert_eq!(points[0].id.as_deref(), Some("26181784"));
        assert_eq!(points[0].class_code, "B16");
        assert_eq!(points[1].id, None);
    }

    #[test]
    fn plain_records_reject_structured_ids() {
        let err = parse_points(r#"[{"POINT_ID": [1, 2], "lat": 0, "lon": 0, "LC1": "A"}]"#).unwrap_err();
        assert!(matches!(err, DatasetError::Json(_)), "got {err}");
    }

    #[test]
    fn parses_geojson_features_in_lon_lat_order() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [12.5, 41.9]},
                "properties": {"POINT_ID": 47162180, "LC1": "E20"}
            }]
        }"#;
        let points = parse_points(json).unwrap();
        assert_relative_eq!(points[0].location.lat, 41.9);
        assert_relative_eq!(points[0].location.lon, 12.5);
        assert_eq!(points[0].id.as_deref(), Some("47162180"));
        assert_eq!(points[0].survey_date, None);
    }

    #[test]
    fn unknown_class_codes_load_and_fail_only_when_styled() {
        let points = parse_points(r#"[{"lat": 0, "lon": 0, "LC1": "Z"}]"#).unwrap();
        assert_eq!(points[0].class_code, "Z");
    }

    #[test]
    fn out_of_range_coordinate_names_the_record() {
        let err = parse_points(r#"[{"lat": 0, "lon": 0, "LC1": "A"}, {"lat": 95, "lon": 0, "LC1": "A"}]"#)
            .unwrap_err();
        assert!(matches!(err, DatasetError::Coordinate { index: 1, .. }), "got {err}");
    }

    #[test]
    fn non_point_geometry_and_missing_class_are_errors() {
        let polygon = r#"{"features": [{"geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [0, 1], [0, 0]]]}, "properties": {"LC1": "A"}}]}"#;
        assert!(matches!(
            parse_points(polygon).unwrap_err(),
            DatasetError::Geometry { index: 0, .. }
        ));
        let no_class = r#"{"features": [{"geometry": {"type": "Point", "coordinates": [0, 0]}, "properties": {}}]}"#;
        assert!(matches!(
            parse_points(no_class).unwrap_err(),
            DatasetError::MissingClass { index: 0 }
        ));
    }

    #[test]
    fn load_points_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"lat": 41.9, "lon": 12.5, "LC1": "G"}}]"#).unwrap();
        let points = load_points(file.path()).unwrap();
        assert_eq!(points.len(), 1);

        let missing = load_points(Path::new("/nonexistent/lucas.json")).unwrap_err();
        assert!(matches!(missing, DatasetError::Io { .. }));
    }
}
