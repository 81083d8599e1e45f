use foundation::geo::{LonLat, ScreenPoint};
use layers::LayerSpec;

use crate::camera::CameraFlight;

/// Contract the rendering surface exposes to the engine.
///
/// The surface owns the basemap, the real camera, and hit-testing. It diffs
/// layer stacks by `LayerSpec::id`; `set_layers` always replaces the full
/// visible stack. Picks travel the other way: the host forwards them into
/// `MapEngine::handle_pick`.
pub trait RenderSurface {
    /// Replace the full visible layer stack.
    fn set_layers(&mut self, layers: Vec<LayerSpec>);

    /// Start an animated camera transition. Non-blocking.
    fn fly_to(&mut self, flight: &CameraFlight);

    /// Project a geographic position to screen pixels under the current
    /// camera. `None` when the position is not projectable (e.g. behind the
    /// horizon at high pitch).
    fn project(&self, position: LonLat) -> Option<ScreenPoint>;
}
