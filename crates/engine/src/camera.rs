use foundation::geo::LonLat;

/// Camera pose over the basemap.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub center: LonLat,
    pub zoom: f64,
    pub pitch_deg: f64,
    pub bearing_deg: f64,
}

impl Default for Camera {
    fn default() -> Self {
        // Initial dashboard view: Manhattan overview.
        Self {
            center: LonLat::new(-73.9712, 40.7831),
            zoom: 12.0,
            pitch_deg: 45.0,
            bearing_deg: 0.0,
        }
    }
}

/// An animated camera transition command, fire-and-forget for the caller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraFlight {
    pub center: LonLat,
    pub zoom: f64,
    pub pitch_deg: f64,
    pub duration_ms: u64,
}

/// Target zoom when flying to a deployment site.
pub const FLY_TO_ZOOM: f64 = 16.0;
/// Target pitch when flying to a deployment site (degrees).
pub const FLY_TO_PITCH_DEG: f64 = 60.0;
/// Fixed site-flight animation duration (milliseconds).
pub const FLY_TO_DURATION_MS: u64 = 2000;

impl CameraFlight {
    /// The standard site flight: fixed zoom, pitch, and duration.
    pub fn to_site(center: LonLat) -> Self {
        Self {
            center,
            zoom: FLY_TO_ZOOM,
            pitch_deg: FLY_TO_PITCH_DEG,
            duration_ms: FLY_TO_DURATION_MS,
        }
    }
}
