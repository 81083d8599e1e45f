//! Static registries: deployment sites and layer descriptors.
//!
//! Everything here is immutable configuration passed explicitly into the
//! components that need it. Nothing is fetched at runtime; the built-in
//! registry covers the September 2024 New York City pilot.

use std::collections::BTreeMap;

use foundation::geo::LonLat;
use serde::{Deserialize, Serialize};

/// Deployment-site coordinates in WGS84 degrees.
///
/// Kept as named degree fields (not `LonLat`) so the registry stays
/// serde-friendly without pulling serde into `foundation`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteCoords {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl SiteCoords {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }

    pub fn lon_lat(self) -> LonLat {
        LonLat::new(self.lon_deg, self.lat_deg)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMetrics {
    pub avg_daily_trips: u32,
    pub total_distance: String,
    pub success_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentSite {
    pub coords: SiteCoords,
    pub title: String,
    pub date: String,
    pub status: String,
    /// Site-level aggregate score, percent.
    pub score_pct: f64,
    pub details: String,
    pub video: String,
    pub metrics: SiteMetrics,
    pub highlights: Vec<String>,
}

/// Immutable mapping from unique site name to site metadata.
///
/// Backed by a `BTreeMap` so iteration order (and everything derived from
/// it, like generated ring geometry) is deterministic.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRegistry {
    pub sites: BTreeMap<String, DeploymentSite>,
}

impl DeploymentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&DeploymentSite> {
        self.sites.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sites.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Sites in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeploymentSite)> {
        self.sites.iter().map(|(name, site)| (name.as_str(), site))
    }

    pub fn insert(&mut self, name: impl Into<String>, site: DeploymentSite) {
        self.sites.insert(name.into(), site);
    }

    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Built-in registry for the September 2024 NYC pilot.
    pub fn nyc_september_2024() -> Self {
        let mut registry = Self::new();

        registry.insert(
            "Elmhurst, Queens",
            DeploymentSite {
                coords: SiteCoords::new(40.738536, -73.887267),
                title: "Elmhurst Deployment".to_string(),
                date: "Sept 15, 2024".to_string(),
                status: "Active".to_string(),
                score_pct: 87.5,
                details: "Urban mobility pilot focused on high-density residential areas \
                          with diverse pedestrian traffic patterns."
                    .to_string(),
                video: "elmhurst_deployment.mp4".to_string(),
                metrics: SiteMetrics {
                    avg_daily_trips: 142,
                    total_distance: "856 km".to_string(),
                    success_rate: "94.3%".to_string(),
                },
                highlights: vec![
                    "Successfully navigated complex intersections".to_string(),
                    "High compliance with traffic signals".to_string(),
                    "Positive community feedback".to_string(),
                ],
            },
        );

        registry.insert(
            "Sutton Place, Manhattan",
            DeploymentSite {
                coords: SiteCoords::new(40.758890, -73.958457),
                title: "Sutton Place Initiative".to_string(),
                date: "Sept 18, 2024".to_string(),
                status: "Active".to_string(),
                score_pct: 92.3,
                details: "Mixed residential-commercial deployment testing navigation in \
                          areas with high pedestrian density."
                    .to_string(),
                video: "sutton_place_deployment.mp4".to_string(),
                metrics: SiteMetrics {
                    avg_daily_trips: 167,
                    total_distance: "923 km".to_string(),
                    success_rate: "96.1%".to_string(),
                },
                highlights: vec![
                    "Optimal performance during peak hours".to_string(),
                    "Seamless integration with bike lanes".to_string(),
                    "Zero safety incidents reported".to_string(),
                ],
            },
        );

        registry.insert(
            "Herald Square, Manhattan",
            DeploymentSite {
                coords: SiteCoords::new(40.748422, -73.988275),
                title: "Herald Square Operations".to_string(),
                date: "Sept 21, 2024".to_string(),
                status: "Active".to_string(),
                score_pct: 89.7,
                details: "High-traffic commercial zone deployment focusing on \
                          pedestrian-dense areas and tourism hotspots."
                    .to_string(),
                video: "herald_square_deployment.mp4".to_string(),
                metrics: SiteMetrics {
                    avg_daily_trips: 198,
                    total_distance: "1,102 km".to_string(),
                    success_rate: "93.8%".to_string(),
                },
                highlights: vec![
                    "Excellent performance in crowded conditions".to_string(),
                    "Adaptive routing during events".to_string(),
                    "Strong business district integration".to_string(),
                ],
            },
        );

        registry.insert(
            "Jackson Heights, Queens",
            DeploymentSite {
                coords: SiteCoords::new(40.747379, -73.889690),
                title: "Jackson Heights Project".to_string(),
                date: "Sept 24, 2024".to_string(),
                status: "Active".to_string(),
                score_pct: 85.9,
                details: "Diverse neighborhood deployment testing multilingual interfaces \
                          and cultural adaptation."
                    .to_string(),
                video: "jackson_heights_deployment.mp4".to_string(),
                metrics: SiteMetrics {
                    avg_daily_trips: 156,
                    total_distance: "784 km".to_string(),
                    success_rate: "92.5%".to_string(),
                },
                highlights: vec![
                    "Successful multilingual community engagement".to_string(),
                    "Effective navigation of street vendor areas".to_string(),
                    "Positive accessibility feedback".to_string(),
                ],
            },
        );

        registry
    }
}

/// UI-facing description of a toggleable layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayerDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

/// Descriptors for the three standard dashboard layers, in draw order.
pub const LAYER_DESCRIPTORS: [LayerDescriptor; 3] = [
    LayerDescriptor {
        id: "census-blocks",
        label: "Census Block Groups",
        description: "Shows census block group boundaries",
    },
    LayerDescriptor {
        id: "deployment-rings",
        label: "Robot Deployment Sites",
        description: "Shows active robot deployment locations",
    },
    LayerDescriptor {
        id: "sidewalk-scores",
        label: "Robotability Scores",
        description: "Shows sidewalk accessibility scores",
    },
];

#[cfg(test)]
mod tests {
    use super::DeploymentRegistry;
    use foundation::geo::LonLat;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_registry_has_four_sites_in_name_order() {
        let registry = DeploymentRegistry::nyc_september_2024();
        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "Elmhurst, Queens",
                "Herald Square, Manhattan",
                "Jackson Heights, Queens",
                "Sutton Place, Manhattan",
            ]
        );
    }

    #[test]
    fn lookup_resolves_coordinates() {
        let registry = DeploymentRegistry::nyc_september_2024();
        let herald = registry.get("Herald Square, Manhattan").expect("site");
        assert_eq!(herald.coords.lon_lat(), LonLat::new(-73.988275, 40.748422));
        assert!(registry.get("Atlantis").is_none());
    }

    #[test]
    fn registry_round_trips_through_json() {
        let registry = DeploymentRegistry::nyc_september_2024();
        let payload = registry.to_json_string().expect("serialize");
        let back = DeploymentRegistry::from_json_str(&payload).expect("parse");
        assert_eq!(registry, back);
    }
}
