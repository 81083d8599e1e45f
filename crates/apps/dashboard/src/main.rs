//! Headless dashboard driver.
//!
//! Loads the two data feeds, runs the layer engine against a logging render
//! surface, and optionally flies to a deployment site. Useful for inspecting
//! the composed layer stack and exporting the generated ring geometry
//! without a browser in the loop.

mod sources;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine::{CameraFlight, MapEngine, RenderSurface};
use foundation::geo::{LonLat, ScreenPoint};
use geodata::GeoDataStore;
use layers::{LayerCompositor, LayerSpec, LayerVisibility, Palette, RingConfig, pulse_rings};

use catalog::{DeploymentRegistry, LAYER_DESCRIPTORS};

#[derive(Debug, Parser)]
#[command(name = "dashboard", about = "Robotability dashboard layer engine driver")]
struct Args {
    /// Sidewalk-scores feed: file path or http(s) URL.
    #[arg(long)]
    sidewalks: String,

    /// Census-boundaries feed: file path or http(s) URL.
    #[arg(long)]
    census: String,

    /// Basemap label layer id to anchor data layers beneath.
    #[arg(long, default_value = "place_suburb")]
    label_anchor: String,

    /// Fly to this deployment site after load and publish its selection.
    #[arg(long)]
    fly_to: Option<String>,

    /// Write the generated pulse-ring GeoJSON to this path.
    #[arg(long)]
    export_rings: Option<PathBuf>,

    /// Hide the census boundary layer.
    #[arg(long)]
    no_census: bool,

    /// Hide the sidewalk score layer.
    #[arg(long)]
    no_scores: bool,
}

/// Surface that logs commands instead of rendering.
///
/// Projection is a plain equirectangular mapping around the last flight
/// target, which is enough to give the selection popup a plausible anchor.
struct LoggingSurface {
    viewport: (f64, f64),
    center: LonLat,
    px_per_deg: f64,
}

impl LoggingSurface {
    fn new() -> Self {
        Self {
            viewport: (1280.0, 720.0),
            center: LonLat::new(-73.9712, 40.7831),
            px_per_deg: 40_000.0,
        }
    }
}

impl RenderSurface for LoggingSurface {
    fn set_layers(&mut self, layers: Vec<LayerSpec>) {
        let ids: Vec<&str> = layers.iter().map(|l| l.id.0).collect();
        info!(stack = ?ids, "layer stack replaced");
        for layer in &layers {
            info!(
                id = %layer.id,
                features = layer.data.len(),
                interactive = layer.interactive,
                extruded = layer.extruded,
                below_labels = layer.below_labels,
                "layer"
            );
        }
    }

    fn fly_to(&mut self, flight: &CameraFlight) {
        info!(
            lon = flight.center.lon_deg,
            lat = flight.center.lat_deg,
            zoom = flight.zoom,
            pitch = flight.pitch_deg,
            duration_ms = flight.duration_ms,
            "camera flight"
        );
        self.center = flight.center;
    }

    fn project(&self, position: LonLat) -> Option<ScreenPoint> {
        let x = self.viewport.0 / 2.0 + (position.lon_deg - self.center.lon_deg) * self.px_per_deg;
        let y = self.viewport.1 / 2.0 - (position.lat_deg - self.center.lat_deg) * self.px_per_deg;
        Some(ScreenPoint::new(x, y))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let client = reqwest::Client::new();

    let registry = DeploymentRegistry::nyc_september_2024();
    for descriptor in LAYER_DESCRIPTORS {
        info!(id = descriptor.id, label = descriptor.label, "layer available");
    }

    // The only suspension point: both feeds fetched concurrently.
    let sidewalk_source = sources::source_for("sidewalks", &args.sidewalks, &client);
    let census_source = sources::source_for("census", &args.census, &client);
    let mut store = GeoDataStore::new();
    let report = store.load(sidewalk_source.as_ref(), census_source.as_ref()).await;
    info!(?report, "feed load finished");

    let ring_config = RingConfig::default();
    if let Some(path) = &args.export_rings {
        let rings = pulse_rings(&registry, &ring_config);
        tokio::fs::write(path, rings.to_geojson_string()?).await?;
        info!(path = %path.display(), features = rings.len(), "ring geometry exported");
    }

    let compositor = LayerCompositor::new(registry, Palette::default(), ring_config);
    let mut engine = MapEngine::new(LoggingSurface::new(), compositor);

    engine.set_visibility(LayerVisibility {
        sidewalk_scores: !args.no_scores,
        census_blocks: !args.no_census,
        deployment_sites: true,
    });
    engine.commit_store(store);
    engine.set_label_anchor(args.label_anchor.as_str());

    if let Some(site) = &args.fly_to {
        match engine.fly_to(site) {
            Some(token) => {
                // Stand-in for the host event loop's one-shot timer.
                tokio::time::sleep(Duration::from_millis(engine::FLY_TO_DURATION_MS)).await;
                if engine.reveal_selection(token) {
                    if let Some(selection) = engine.selection() {
                        info!(
                            site = %selection.site,
                            x = selection.anchor.x,
                            y = selection.anchor.y,
                            "selection published"
                        );
                    }
                }
            }
            None => info!(site = %site, "no such deployment site"),
        }
    }

    Ok(())
}
