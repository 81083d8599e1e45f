//! The dashboard controller: one owner for the state snapshot, one place
//! that recomposes.
//!
//! All state lives here and is mutated only through the entry points below;
//! every qualifying change (visibility, committed data, label anchor)
//! triggers an immediate, full, synchronous recompose pushed to the surface.
//! There is no partial patching and no hidden dependency tracking.

use foundation::geo::ScreenPoint;
use geodata::{Feature, GeoDataStore};
use layers::{LayerCompositor, LayerVisibility};
use tracing::{debug, warn};

use crate::camera::{Camera, CameraFlight};
use crate::selection::Selection;
use crate::surface::RenderSurface;

/// Handle for one scheduled post-flight selection reveal.
///
/// A new `fly_to` invalidates the previously issued token, so a timer that
/// fires late cannot publish a selection for a superseded flight
/// (last-write-wins).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RevealToken(u64);

pub struct MapEngine<S: RenderSurface> {
    surface: S,
    compositor: LayerCompositor,
    store: GeoDataStore,
    visibility: LayerVisibility,
    label_anchor: Option<String>,
    camera: Camera,
    selection: Option<Selection>,
    pending_reveal: Option<(RevealToken, String)>,
    next_reveal: u64,
}

impl<S: RenderSurface> MapEngine<S> {
    /// Create the engine and push the initial stack (rings only until data
    /// and the label anchor arrive).
    pub fn new(surface: S, compositor: LayerCompositor) -> Self {
        let mut engine = Self {
            surface,
            compositor,
            store: GeoDataStore::new(),
            visibility: LayerVisibility::default(),
            label_anchor: None,
            camera: Camera::default(),
            selection: None,
            pending_reveal: None,
            next_reveal: 0,
        };
        engine.recompose();
        engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn store(&self) -> &GeoDataStore {
        &self.store
    }

    pub fn visibility(&self) -> LayerVisibility {
        self.visibility
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Replace the visibility toggles.
    pub fn set_visibility(&mut self, visibility: LayerVisibility) {
        if self.visibility == visibility {
            return;
        }
        self.visibility = visibility;
        self.recompose();
    }

    /// Record the basemap's text-label layer id once the style has loaded.
    /// Below-label layers stay deferred until this arrives.
    pub fn set_label_anchor(&mut self, anchor_id: impl Into<String>) {
        let anchor_id = anchor_id.into();
        if self.label_anchor.as_deref() == Some(anchor_id.as_str()) {
            return;
        }
        self.label_anchor = Some(anchor_id);
        self.recompose();
    }

    pub fn label_anchor(&self) -> Option<&str> {
        self.label_anchor.as_deref()
    }

    /// Adopt a freshly loaded store (the load cycle itself is async and
    /// happens outside the engine).
    pub fn commit_store(&mut self, store: GeoDataStore) {
        self.store = store;
        self.recompose();
    }

    /// Command a flight to a registered site.
    ///
    /// Returns the reveal token the host's event loop should deliver back
    /// via [`reveal_selection`](Self::reveal_selection) once the flight
    /// duration has elapsed. An unknown site name is a logged no-op.
    pub fn fly_to(&mut self, site: &str) -> Option<RevealToken> {
        let Some(deployment) = self.compositor.registry().get(site) else {
            debug!(site, "fly_to ignored: unknown site");
            return None;
        };

        let flight = CameraFlight::to_site(deployment.coords.lon_lat());
        self.surface.fly_to(&flight);
        self.camera = Camera {
            center: flight.center,
            zoom: flight.zoom,
            pitch_deg: flight.pitch_deg,
            bearing_deg: self.camera.bearing_deg,
        };

        let token = RevealToken(self.next_reveal);
        self.next_reveal += 1;
        // Supersedes any outstanding reveal; its timer becomes a dead letter.
        self.pending_reveal = Some((token, site.to_string()));
        Some(token)
    }

    /// Publish the post-flight selection for `token`.
    ///
    /// Only the most recently issued token does anything; stale tokens are
    /// rejected. Returns whether a selection was published.
    pub fn reveal_selection(&mut self, token: RevealToken) -> bool {
        match self.pending_reveal.take() {
            Some((pending, site)) if pending == token => {
                let Some(deployment) = self.compositor.registry().get(&site) else {
                    return false;
                };
                match self.surface.project(deployment.coords.lon_lat()) {
                    Some(anchor) => {
                        self.selection = Some(Selection::new(site, anchor));
                        true
                    }
                    None => {
                        warn!(site = %site, "site not projectable after flight; no selection");
                        false
                    }
                }
            }
            other => {
                debug!(?token, "stale reveal token ignored");
                self.pending_reveal = other;
                false
            }
        }
    }

    /// Resolve a pick from the surface.
    ///
    /// A hit on a feature naming a registered site selects it synchronously
    /// at the pick's screen coordinates, bypassing the camera-animation
    /// path. Anything else counts as a background pick and dismisses the
    /// current selection. Either way an outstanding reveal is cancelled: the
    /// user's direct interaction wins over a timer.
    pub fn handle_pick(&mut self, at: ScreenPoint, picked: Option<&Feature>) {
        self.pending_reveal = None;

        let site = picked
            .and_then(|f| f.property_str("name"))
            .filter(|name| self.compositor.registry().contains(name));
        self.selection = site.map(|name| Selection::new(name, at));
    }

    /// Explicit dismissal of the popup.
    pub fn clear_selection(&mut self) {
        self.pending_reveal = None;
        self.selection = None;
    }

    fn recompose(&mut self) {
        let layers =
            self.compositor
                .compose(self.visibility, &self.store, self.label_anchor.as_deref());
        self.surface.set_layers(layers);
    }
}

#[cfg(test)]
mod tests {
    use super::{MapEngine, RenderSurface};
    use crate::camera::CameraFlight;
    use crate::selection::Selection;
    use catalog::DeploymentRegistry;
    use foundation::geo::{LonLat, ScreenPoint};
    use geodata::{Feature, FeatureCollection, GeoDataStore, Geometry};
    use layers::{LayerCompositor, LayerSpec, LayerVisibility, Palette, RingConfig};

    /// Records every surface command; projection is a fixed affine map so
    /// anchors are predictable.
    #[derive(Default)]
    struct RecordingSurface {
        stacks: Vec<Vec<LayerSpec>>,
        flights: Vec<CameraFlight>,
    }

    impl RenderSurface for RecordingSurface {
        fn set_layers(&mut self, layers: Vec<LayerSpec>) {
            self.stacks.push(layers);
        }

        fn fly_to(&mut self, flight: &CameraFlight) {
            self.flights.push(*flight);
        }

        fn project(&self, position: LonLat) -> Option<ScreenPoint> {
            Some(ScreenPoint::new(
                (position.lon_deg + 74.0) * 1000.0,
                (41.0 - position.lat_deg) * 1000.0,
            ))
        }
    }

    fn engine() -> MapEngine<RecordingSurface> {
        let compositor = LayerCompositor::new(
            DeploymentRegistry::nyc_september_2024(),
            Palette::default(),
            RingConfig::default(),
        );
        MapEngine::new(RecordingSurface::default(), compositor)
    }

    fn loaded_store() -> GeoDataStore {
        let mut store = GeoDataStore::new();
        store.commit_sidewalks(FeatureCollection::new(vec![
            Feature::new(Geometry::LineString(vec![
                LonLat::new(-73.99, 40.74),
                LonLat::new(-73.98, 40.75),
            ]))
            .with_property("score", 0.6),
        ]));
        store.commit_census_blocks(FeatureCollection::default());
        store
    }

    fn latest_ids(engine: &MapEngine<RecordingSurface>) -> Vec<&'static str> {
        engine
            .surface()
            .stacks
            .last()
            .expect("at least one stack")
            .iter()
            .map(|l| l.id.0)
            .collect()
    }

    #[test]
    fn initial_stack_is_rings_only() {
        let engine = engine();
        assert_eq!(engine.surface().stacks.len(), 1);
        assert_eq!(latest_ids(&engine), vec!["deployment-rings"]);
    }

    #[test]
    fn data_and_anchor_complete_the_stack() {
        let mut engine = engine();
        engine.commit_store(loaded_store());
        // Anchor still unknown: below-label layers stay deferred.
        assert_eq!(latest_ids(&engine), vec!["deployment-rings"]);

        engine.set_label_anchor("place_suburb");
        assert_eq!(
            latest_ids(&engine),
            vec!["census-blocks", "deployment-rings", "sidewalk-scores"]
        );
    }

    #[test]
    fn visibility_change_recomposes_once() {
        let mut engine = engine();
        let before = engine.surface().stacks.len();
        engine.set_visibility(LayerVisibility::NONE);
        assert_eq!(engine.surface().stacks.len(), before + 1);
        assert!(latest_ids(&engine).is_empty());

        // Setting the identical value is not a qualifying change.
        engine.set_visibility(LayerVisibility::NONE);
        assert_eq!(engine.surface().stacks.len(), before + 1);
    }

    #[test]
    fn fly_to_unknown_site_is_a_no_op() {
        let mut engine = engine();
        assert!(engine.fly_to("Atlantis").is_none());
        assert!(engine.surface().flights.is_empty());
        assert!(engine.selection().is_none());
    }

    #[test]
    fn fly_to_then_reveal_publishes_projected_selection() {
        let mut engine = engine();
        let token = engine.fly_to("Herald Square, Manhattan").expect("token");

        let flight = engine.surface().flights[0];
        assert_eq!(flight.center, LonLat::new(-73.988275, 40.748422));
        assert_eq!(flight.zoom, 16.0);
        assert_eq!(flight.duration_ms, 2000);
        assert_eq!(engine.camera().zoom, 16.0);
        assert_eq!(engine.camera().pitch_deg, 60.0);
        // Nothing selected until the timer comes back.
        assert!(engine.selection().is_none());

        assert!(engine.reveal_selection(token));
        let selection = engine.selection().expect("selection");
        assert_eq!(selection.site, "Herald Square, Manhattan");
        let expected = RecordingSurface::default()
            .project(LonLat::new(-73.988275, 40.748422))
            .expect("projected");
        assert_eq!(selection.anchor, expected);
    }

    #[test]
    fn overlapping_flights_last_write_wins() {
        let mut engine = engine();
        let first = engine.fly_to("Herald Square, Manhattan").expect("token");
        let second = engine.fly_to("Sutton Place, Manhattan").expect("token");

        // The first timer fires late: rejected, no selection.
        assert!(!engine.reveal_selection(first));
        assert!(engine.selection().is_none());

        assert!(engine.reveal_selection(second));
        assert_eq!(
            engine.selection().map(|s| s.site.as_str()),
            Some("Sutton Place, Manhattan")
        );

        // A token only fires once.
        assert!(!engine.reveal_selection(second));
    }

    #[test]
    fn ring_pick_selects_synchronously_at_pick_point() {
        let mut engine = engine();
        let ring = Feature::new(Geometry::Point(LonLat::new(0.0, 0.0)))
            .with_property("name", "Elmhurst, Queens");
        engine.handle_pick(ScreenPoint::new(400.0, 300.0), Some(&ring));

        assert_eq!(
            engine.selection(),
            Some(&Selection::new(
                "Elmhurst, Queens",
                ScreenPoint::new(400.0, 300.0)
            ))
        );
    }

    #[test]
    fn background_pick_clears_selection_and_pending_reveal() {
        let mut engine = engine();
        let token = engine.fly_to("Elmhurst, Queens").expect("token");
        engine.handle_pick(ScreenPoint::new(10.0, 10.0), None);

        assert!(engine.selection().is_none());
        // The user's dismissal wins over the in-flight timer.
        assert!(!engine.reveal_selection(token));
        assert!(engine.selection().is_none());
    }

    #[test]
    fn pick_on_feature_without_registered_site_clears() {
        let mut engine = engine();
        let stray = Feature::new(Geometry::Point(LonLat::new(0.0, 0.0)))
            .with_property("name", "Atlantis");
        engine.handle_pick(ScreenPoint::new(5.0, 5.0), Some(&stray));
        assert!(engine.selection().is_none());
    }

    #[test]
    fn clear_selection_dismisses() {
        let mut engine = engine();
        let ring = Feature::new(Geometry::Point(LonLat::new(0.0, 0.0)))
            .with_property("name", "Elmhurst, Queens");
        engine.handle_pick(ScreenPoint::new(1.0, 2.0), Some(&ring));
        assert!(engine.selection().is_some());

        engine.clear_selection();
        assert!(engine.selection().is_none());
    }
}
