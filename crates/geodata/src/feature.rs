use foundation::geo::LonLat;
use serde_json::{Map, Value};

/// Geographic feature geometry, GeoJSON-shaped.
///
/// Coordinates are WGS84 degrees. Polygon rings follow the GeoJSON
/// convention: first ring is the exterior, the rest are holes, and a ring is
/// closed (first vertex repeated as the last).
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(LonLat),
    MultiPoint(Vec<LonLat>),
    LineString(Vec<LonLat>),
    MultiLineString(Vec<Vec<LonLat>>),
    Polygon(Vec<Vec<LonLat>>),
    MultiPolygon(Vec<Vec<Vec<LonLat>>>),
}

/// A single feature: geometry plus a free-form property bag.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            properties: Map::new(),
            geometry,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property_f64(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(|v| v.as_f64())
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    /// Normalized accessibility score carried by sidewalk features.
    ///
    /// Missing or non-numeric values yield `None`; callers are expected to
    /// treat that as the lowest score rather than an error.
    pub fn score(&self) -> Option<f64> {
        self.property_f64("score")
    }
}

/// Ordered feature list. Identity is positional, not keyed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
