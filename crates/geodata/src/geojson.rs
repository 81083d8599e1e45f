//! GeoJSON codec for the feature model.
//!
//! Parsing is value-level (via `serde_json::Value`) so unknown members are
//! tolerated and property bags survive untouched. Geometry coordinates are
//! validated; properties are not.

use foundation::geo::LonLat;
use serde_json::{Map, Value, json};

use crate::feature::{Feature, FeatureCollection, Geometry};

#[derive(Debug)]
pub enum GeoJsonError {
    Json(serde_json::Error),
    NotAFeatureCollection,
    Feature { index: usize, reason: String },
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::Json(e) => write!(f, "invalid JSON: {e}"),
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected a GeoJSON FeatureCollection")
            }
            GeoJsonError::Feature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoJsonError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl FeatureCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload).map_err(GeoJsonError::Json)?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, GeoJsonError> {
        if value.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(GeoJsonError::NotAFeatureCollection);
        }
        let raw_features = value
            .get("features")
            .and_then(Value::as_array)
            .ok_or(GeoJsonError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(raw_features.len());
        for (index, raw) in raw_features.iter().enumerate() {
            let feature = parse_feature(raw)
                .map_err(|reason| GeoJsonError::Feature { index, reason })?;
            features.push(feature);
        }
        Ok(Self { features })
    }

    /// Semantic round-trip exporter; property ordering may differ from input.
    pub fn to_geojson_value(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": self
                .features
                .iter()
                .map(feature_to_value)
                .collect::<Vec<Value>>(),
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_geojson_value())
    }
}

fn parse_feature(raw: &Value) -> Result<Feature, String> {
    if raw.get("type").and_then(Value::as_str) != Some("Feature") {
        return Err("not a Feature object".to_string());
    }

    let id = match raw.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let properties = raw
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let geometry = raw.get("geometry").ok_or("missing geometry")?;
    let geometry = parse_geometry(geometry)?;

    Ok(Feature {
        id,
        properties,
        geometry,
    })
}

fn parse_geometry(raw: &Value) -> Result<Geometry, String> {
    let ty = raw
        .get("type")
        .and_then(Value::as_str)
        .ok_or("geometry missing type")?;
    let coords = raw.get("coordinates").ok_or("geometry missing coordinates")?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_position(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_positions(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_positions(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_nested(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_nested(coords)?)),
        "MultiPolygon" => {
            let polys = as_array(coords, "MultiPolygon coordinates")?
                .iter()
                .map(parse_nested)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Geometry::MultiPolygon(polys))
        }
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_position(raw: &Value) -> Result<LonLat, String> {
    let pair = as_array(raw, "position")?;
    let (Some(lon), Some(lat)) = (
        pair.first().and_then(Value::as_f64),
        pair.get(1).and_then(Value::as_f64),
    ) else {
        return Err("position must be [lon, lat] numbers".to_string());
    };
    Ok(LonLat::new(lon, lat))
}

fn parse_positions(raw: &Value) -> Result<Vec<LonLat>, String> {
    as_array(raw, "coordinates")?
        .iter()
        .map(parse_position)
        .collect()
}

fn parse_nested(raw: &Value) -> Result<Vec<Vec<LonLat>>, String> {
    as_array(raw, "coordinates")?
        .iter()
        .map(parse_positions)
        .collect()
}

fn as_array<'a>(raw: &'a Value, what: &str) -> Result<&'a Vec<Value>, String> {
    raw.as_array().ok_or_else(|| format!("{what} must be an array"))
}

fn feature_to_value(feature: &Feature) -> Value {
    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::from("Feature"));
    if let Some(id) = &feature.id {
        obj.insert("id".to_string(), Value::from(id.clone()));
    }
    obj.insert(
        "properties".to_string(),
        Value::Object(feature.properties.clone()),
    );
    obj.insert("geometry".to_string(), geometry_to_value(&feature.geometry));
    Value::Object(obj)
}

fn geometry_to_value(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Point(p) => json!({ "type": "Point", "coordinates": position(p) }),
        Geometry::MultiPoint(ps) => {
            json!({ "type": "MultiPoint", "coordinates": positions(ps) })
        }
        Geometry::LineString(ps) => {
            json!({ "type": "LineString", "coordinates": positions(ps) })
        }
        Geometry::MultiLineString(lines) => {
            json!({ "type": "MultiLineString", "coordinates": nested(lines) })
        }
        Geometry::Polygon(rings) => {
            json!({ "type": "Polygon", "coordinates": nested(rings) })
        }
        Geometry::MultiPolygon(polys) => {
            let coords: Vec<Value> = polys.iter().map(|p| nested(p)).collect();
            json!({ "type": "MultiPolygon", "coordinates": coords })
        }
    }
}

fn position(p: &LonLat) -> Value {
    json!([p.lon_deg, p.lat_deg])
}

fn positions(ps: &[LonLat]) -> Value {
    Value::Array(ps.iter().map(position).collect())
}

fn nested(lists: &[Vec<LonLat>]) -> Value {
    Value::Array(lists.iter().map(|ps| positions(ps)).collect())
}

#[cfg(test)]
mod tests {
    use super::GeoJsonError;
    use crate::feature::{FeatureCollection, Geometry};
    use foundation::geo::LonLat;

    const SIDEWALKS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "score": 0.82, "borough": "Manhattan" },
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-73.99, 40.74], [-73.98, 40.75]]
                }
            },
            {
                "type": "Feature",
                "id": 7,
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-73.9, 40.7], [-73.8, 40.7], [-73.8, 40.8], [-73.9, 40.7]]]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_feature_collection() {
        let fc = FeatureCollection::from_geojson_str(SIDEWALKS).expect("parse");
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.features[0].score(), Some(0.82));
        assert_eq!(fc.features[1].id.as_deref(), Some("7"));
        assert!(matches!(
            fc.features[0].geometry,
            Geometry::LineString(ref pts) if pts[0] == LonLat::new(-73.99, 40.74)
        ));
    }

    #[test]
    fn rejects_non_collection_root() {
        let err = FeatureCollection::from_geojson_str(r#"{"type":"Feature"}"#).unwrap_err();
        assert!(matches!(err, GeoJsonError::NotAFeatureCollection));
    }

    #[test]
    fn rejects_bad_geometry_with_index() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "Point", "coordinates": [-73.9, 40.7] } },
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "Blob", "coordinates": [] } }
            ]
        }"#;
        let err = FeatureCollection::from_geojson_str(payload).unwrap_err();
        assert!(matches!(err, GeoJsonError::Feature { index: 1, .. }));
    }

    #[test]
    fn round_trips_semantics() {
        let fc = FeatureCollection::from_geojson_str(SIDEWALKS).expect("parse");
        let emitted = fc.to_geojson_string().expect("emit");
        let back = FeatureCollection::from_geojson_str(&emitted).expect("reparse");
        assert_eq!(fc, back);
    }
}
