//! Layer composition: visibility flags + data presence -> ordered layer specs.
//!
//! `LayerCompositor::compose` is a pure function of its inputs. Every call
//! rebuilds the full stack; the rendering surface is responsible for diffing
//! by layer id.

use std::sync::Arc;

use catalog::DeploymentRegistry;
use foundation::color::{Rgb, Rgba, alpha_from_unit, with_alpha};
use geodata::{Feature, FeatureCollection, GeoDataStore};

use crate::rings::{self, RingConfig};
use crate::symbology::Palette;

/// Stable layer identity, used by the rendering surface for diffing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub &'static str);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

pub const CENSUS_BLOCKS_LAYER: LayerId = LayerId("census-blocks");
pub const DEPLOYMENT_RINGS_LAYER: LayerId = LayerId("deployment-rings");
pub const SIDEWALK_SCORES_LAYER: LayerId = LayerId("sidewalk-scores");

/// Per-feature color rule.
///
/// Kept as data (not closures) so layer specs stay comparable and the
/// evaluation is a pure, total function of the feature.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintStyle {
    /// No paint for this channel.
    Unpainted,
    Fixed(Rgba),
    /// Palette bucket of the feature's `score` property.
    ScoreBucket(Palette),
    /// Fixed accent hue with alpha taken from the feature's `opacity`
    /// property (missing opacity renders invisible, not opaque).
    PulseAccent(Rgb),
}

impl PaintStyle {
    pub fn color_for(&self, feature: &Feature) -> Rgba {
        match self {
            PaintStyle::Unpainted => [0, 0, 0, 0],
            PaintStyle::Fixed(color) => *color,
            PaintStyle::ScoreBucket(palette) => palette.score_color(feature.score()),
            PaintStyle::PulseAccent(rgb) => {
                let opacity = feature.property_f64(rings::PROP_OPACITY).unwrap_or(0.0);
                with_alpha(*rgb, alpha_from_unit(opacity))
            }
        }
    }
}

/// Per-feature extrusion rule.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElevationStyle {
    Flat,
    /// Read a numeric property; missing or negative values clamp to 0.
    Property(&'static str),
}

impl ElevationStyle {
    pub fn elevation_for(&self, feature: &Feature) -> f64 {
        match self {
            ElevationStyle::Flat => 0.0,
            ElevationStyle::Property(key) => feature.property_f64(key).unwrap_or(0.0).max(0.0),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DepthMode {
    pub depth_test: bool,
    pub depth_write: bool,
    pub alpha_blend: bool,
}

impl DepthMode {
    /// Flat overlay layers: blended, no depth interaction.
    pub const OVERLAY: Self = Self {
        depth_test: false,
        depth_write: false,
        alpha_blend: true,
    };

    /// Extruded geometry: nearer fragments must occlude farther ones.
    pub const EXTRUDED: Self = Self {
        depth_test: true,
        depth_write: true,
        alpha_blend: true,
    };
}

/// One renderable unit handed to the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: LayerId,
    pub data: Arc<FeatureCollection>,
    /// Whether the layer participates in hit-testing.
    pub interactive: bool,
    pub stroked: bool,
    pub filled: bool,
    pub extruded: bool,
    pub line_width_scale: f64,
    /// Draw beneath the basemap's text-label layer.
    pub below_labels: bool,
    pub stroke: PaintStyle,
    pub fill: PaintStyle,
    pub elevation: ElevationStyle,
    pub depth: DepthMode,
}

/// UI toggles for the three dashboard layers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayerVisibility {
    pub sidewalk_scores: bool,
    pub census_blocks: bool,
    pub deployment_sites: bool,
}

impl LayerVisibility {
    pub const ALL: Self = Self {
        sidewalk_scores: true,
        census_blocks: true,
        deployment_sites: true,
    };

    pub const NONE: Self = Self {
        sidewalk_scores: false,
        census_blocks: false,
        deployment_sites: false,
    };
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self::ALL
    }
}

const CENSUS_STROKE: Rgba = [100, 100, 100, 100];
const CENSUS_LINE_WIDTH_SCALE: f64 = 3.0;
const SCORE_LINE_WIDTH_SCALE: f64 = 12.0;
const PULSE_ACCENT: Rgb = [0, 128, 255];

/// Builds the ordered layer stack from the current state snapshot.
///
/// Configuration (registry, palette, ring parameters) is fixed at
/// construction; `compose` varies only with visibility, data presence, and
/// the label anchor.
///
/// Ordering contract (bottom to top): census boundaries, deployment pulse
/// rings, sidewalk scores. Omitted layers are absent, never reordered.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCompositor {
    registry: DeploymentRegistry,
    palette: Palette,
    ring_config: RingConfig,
}

impl LayerCompositor {
    pub fn new(registry: DeploymentRegistry, palette: Palette, ring_config: RingConfig) -> Self {
        Self {
            registry,
            palette,
            ring_config,
        }
    }

    pub fn registry(&self) -> &DeploymentRegistry {
        &self.registry
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn ring_config(&self) -> &RingConfig {
        &self.ring_config
    }

    /// Compose the full ordered layer stack.
    ///
    /// A layer is included iff its flag is set AND its data is present; the
    /// ring layer derives its own geometry and needs no external data.
    /// Layers that must sit below basemap labels (census, scores) are
    /// deferred while `label_anchor` is unknown rather than drawn above the
    /// labels.
    pub fn compose(
        &self,
        visibility: LayerVisibility,
        store: &GeoDataStore,
        label_anchor: Option<&str>,
    ) -> Vec<LayerSpec> {
        let mut layers = Vec::with_capacity(3);
        let labels_ready = label_anchor.is_some();

        if visibility.census_blocks && labels_ready {
            if let Some(data) = store.census_blocks() {
                layers.push(self.census_layer(Arc::clone(data)));
            }
        }

        if visibility.deployment_sites {
            let data = Arc::new(rings::pulse_rings(&self.registry, &self.ring_config));
            layers.push(self.ring_layer(data));
        }

        if visibility.sidewalk_scores && labels_ready {
            if let Some(data) = store.sidewalks() {
                layers.push(self.score_layer(Arc::clone(data)));
            }
        }

        layers
    }

    fn census_layer(&self, data: Arc<FeatureCollection>) -> LayerSpec {
        LayerSpec {
            id: CENSUS_BLOCKS_LAYER,
            data,
            interactive: false,
            stroked: true,
            filled: false,
            extruded: false,
            line_width_scale: CENSUS_LINE_WIDTH_SCALE,
            below_labels: true,
            stroke: PaintStyle::Fixed(CENSUS_STROKE),
            fill: PaintStyle::Unpainted,
            elevation: ElevationStyle::Flat,
            depth: DepthMode::OVERLAY,
        }
    }

    fn ring_layer(&self, data: Arc<FeatureCollection>) -> LayerSpec {
        LayerSpec {
            id: DEPLOYMENT_RINGS_LAYER,
            data,
            interactive: true,
            stroked: false,
            filled: true,
            extruded: true,
            line_width_scale: 1.0,
            below_labels: false,
            stroke: PaintStyle::Unpainted,
            fill: PaintStyle::PulseAccent(PULSE_ACCENT),
            elevation: ElevationStyle::Property(rings::PROP_HEIGHT),
            depth: DepthMode::EXTRUDED,
        }
    }

    fn score_layer(&self, data: Arc<FeatureCollection>) -> LayerSpec {
        // One bucketing rule for both paint channels; see DESIGN.md on the
        // historical stroke-scale discrepancy.
        LayerSpec {
            id: SIDEWALK_SCORES_LAYER,
            data,
            interactive: true,
            stroked: true,
            filled: true,
            extruded: false,
            line_width_scale: SCORE_LINE_WIDTH_SCALE,
            below_labels: true,
            stroke: PaintStyle::ScoreBucket(self.palette.clone()),
            fill: PaintStyle::ScoreBucket(self.palette.clone()),
            elevation: ElevationStyle::Flat,
            depth: DepthMode::OVERLAY,
        }
    }
}
