//! Procedural pulse-ring geometry for deployment sites.
//!
//! Each site is marked by a stack of N rings that widen toward the ground and
//! narrow with height while fading out, which reads as an expanding 3-D pulse
//! once the renderer extrudes them. Geometry is regenerated in full on every
//! compositing pass; there is no cached or incremental state.

use std::f64::consts::{FRAC_PI_2, TAU};

use catalog::DeploymentRegistry;
use foundation::geo::LonLat;
use geodata::{Feature, FeatureCollection, Geometry};

/// Property keys carried by every generated ring feature.
pub const PROP_SITE: &str = "name";
pub const PROP_VIDEO: &str = "video";
pub const PROP_LEVEL: &str = "level";
pub const PROP_HEIGHT: &str = "height";
pub const PROP_OPACITY: &str = "opacity";

#[derive(Debug, Clone, PartialEq)]
pub struct RingConfig {
    /// Rings per site.
    pub ring_count: usize,
    /// Radius of the lowest ring, in geographic degrees (~400 m at NYC
    /// latitudes for the default). Offsets are applied as raw degrees; see
    /// `LonLat::offset_deg` for the approximation caveat.
    pub max_radius_deg: f64,
    /// Height of the topmost ring, meters.
    pub max_height_m: f64,
    /// Opacity of the lowest ring; fades linearly to 0 at the top.
    pub base_opacity: f64,
    /// Circle approximation segment count.
    pub segments: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            ring_count: 15,
            max_radius_deg: 0.004,
            max_height_m: 150.0,
            base_opacity: 0.3,
            segments: 32,
        }
    }
}

/// Generate the pulse-ring collection for every registered site.
///
/// Ordering contract:
/// - Sites are emitted in registry (name) order, rings in ascending level.
///
/// Per ring level `i` with `progress = i / (N - 1)`:
/// - radius shrinks as `cos(progress * PI/2)`, max at level 0, 0 at the top;
/// - height grows as `sin(progress * PI/2)`, 0 at level 0;
/// - opacity fades as `1 - progress`.
///
/// Every polygon ring is closed with a vertex identical to the first.
pub fn pulse_rings(registry: &DeploymentRegistry, config: &RingConfig) -> FeatureCollection {
    let mut features = Vec::with_capacity(registry.len() * config.ring_count);

    for (name, site) in registry.iter() {
        let center = site.coords.lon_lat();
        for level in 0..config.ring_count {
            let progress = if config.ring_count > 1 {
                level as f64 / (config.ring_count - 1) as f64
            } else {
                0.0
            };
            let radius_deg = config.max_radius_deg * (progress * FRAC_PI_2).cos();
            let height_m = config.max_height_m * (progress * FRAC_PI_2).sin();
            let opacity = config.base_opacity * (1.0 - progress);

            let ring = circle_ring(center, radius_deg, config.segments);
            let feature = Feature::new(Geometry::Polygon(vec![ring]))
                .with_property(PROP_SITE, name)
                .with_property(PROP_VIDEO, site.video.as_str())
                .with_property(PROP_LEVEL, level as u64)
                .with_property(PROP_HEIGHT, height_m)
                .with_property(PROP_OPACITY, opacity);
            features.push(feature);
        }
    }

    FeatureCollection::new(features)
}

/// Closed circle approximation around `center` in planar degree offsets.
fn circle_ring(center: LonLat, radius_deg: f64, segments: usize) -> Vec<LonLat> {
    let segments = segments.max(3);
    let mut coords = Vec::with_capacity(segments + 1);
    for step in 0..segments {
        let angle = step as f64 / segments as f64 * TAU;
        coords.push(center.offset_deg(angle.cos() * radius_deg, angle.sin() * radius_deg));
    }
    // Close with an exact copy of the first vertex, not an angle-2*PI
    // recomputation, so first == last holds bit-for-bit.
    let first = coords[0];
    coords.push(first);
    coords
}

#[cfg(test)]
mod tests {
    use super::{PROP_HEIGHT, PROP_LEVEL, PROP_OPACITY, PROP_SITE, PROP_VIDEO, RingConfig, pulse_rings};
    use catalog::DeploymentRegistry;
    use geodata::{Feature, Geometry};

    fn ring_vertices(feature: &Feature) -> &[foundation::geo::LonLat] {
        match &feature.geometry {
            Geometry::Polygon(rings) => &rings[0],
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn emits_ring_count_closed_polygons_per_site() {
        let registry = DeploymentRegistry::nyc_september_2024();
        let config = RingConfig::default();
        let collection = pulse_rings(&registry, &config);

        assert_eq!(collection.len(), registry.len() * 15);
        for feature in &collection.features {
            let coords = ring_vertices(feature);
            assert_eq!(coords.len(), config.segments + 1);
            assert_eq!(coords.first(), coords.last());
        }
    }

    #[test]
    fn ramps_are_strictly_monotone_across_levels() {
        let registry = DeploymentRegistry::nyc_september_2024();
        let config = RingConfig::default();
        let collection = pulse_rings(&registry, &config);

        let site = "Herald Square, Manhattan";
        let center = registry.get(site).expect("site").coords.lon_lat();
        let rings: Vec<&Feature> = collection
            .features
            .iter()
            .filter(|f| f.property_str(PROP_SITE) == Some(site))
            .collect();
        assert_eq!(rings.len(), 15);

        let mut prev_radius = f64::INFINITY;
        let mut prev_height = f64::NEG_INFINITY;
        let mut prev_opacity = f64::INFINITY;
        for (level, feature) in rings.iter().enumerate() {
            assert_eq!(feature.property_f64(PROP_LEVEL), Some(level as f64));

            // The first vertex sits at angle 0, so its longitude offset from
            // the center is exactly the ring radius.
            let radius = ring_vertices(feature)[0].lon_deg - center.lon_deg;
            let height = feature.property_f64(PROP_HEIGHT).expect("height");
            let opacity = feature.property_f64(PROP_OPACITY).expect("opacity");

            assert!(radius < prev_radius, "radius not decreasing at level {level}");
            assert!(height > prev_height, "height not increasing at level {level}");
            assert!(opacity < prev_opacity, "opacity not fading at level {level}");
            assert!(height >= 0.0 && opacity >= 0.0);

            prev_radius = radius;
            prev_height = height;
            prev_opacity = opacity;
        }
    }

    #[test]
    fn endpoints_match_config_extremes() {
        let registry = DeploymentRegistry::nyc_september_2024();
        let config = RingConfig::default();
        let collection = pulse_rings(&registry, &config);

        let first = &collection.features[0];
        assert_eq!(first.property_f64(PROP_HEIGHT), Some(0.0));
        assert_eq!(first.property_f64(PROP_OPACITY), Some(config.base_opacity));

        let last = &collection.features[config.ring_count - 1];
        assert_eq!(last.property_f64(PROP_HEIGHT), Some(config.max_height_m));
        assert_eq!(last.property_f64(PROP_OPACITY), Some(0.0));
    }

    #[test]
    fn single_ring_config_does_not_divide_by_zero() {
        let registry = DeploymentRegistry::nyc_september_2024();
        let config = RingConfig {
            ring_count: 1,
            ..RingConfig::default()
        };
        let collection = pulse_rings(&registry, &config);
        assert_eq!(collection.len(), registry.len());
        // A lone ring keeps the innermost ramp values.
        let f = &collection.features[0];
        assert_eq!(f.property_f64(PROP_HEIGHT), Some(0.0));
        assert_eq!(f.property_f64(PROP_OPACITY), Some(config.base_opacity));
    }

    #[test]
    fn rings_carry_site_name_and_video_for_picks() {
        let registry = DeploymentRegistry::nyc_september_2024();
        let collection = pulse_rings(&registry, &RingConfig::default());

        for feature in &collection.features {
            let site = feature.property_str(PROP_SITE).expect("site name");
            let video = feature.property_str(PROP_VIDEO).expect("video asset");
            assert_eq!(
                registry.get(site).map(|s| s.video.as_str()),
                Some(video)
            );
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let registry = DeploymentRegistry::nyc_september_2024();
        let config = RingConfig::default();
        assert_eq!(
            pulse_rings(&registry, &config),
            pulse_rings(&registry, &config)
        );
    }
}
