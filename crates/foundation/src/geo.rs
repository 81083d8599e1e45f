/// Geographic position in WGS84 degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    /// Offset by raw degree deltas.
    ///
    /// This is a planar approximation: degree offsets are applied directly,
    /// without latitude scaling. Valid for radii of a few hundred meters at
    /// mid latitudes; not valid for large offsets.
    pub fn offset_deg(self, dlon_deg: f64, dlat_deg: f64) -> Self {
        Self::new(self.lon_deg + dlon_deg, self.lat_deg + dlat_deg)
    }
}

/// Screen-space position in pixels, origin top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::{LonLat, ScreenPoint};

    #[test]
    fn offset_applies_raw_degrees() {
        let p = LonLat::new(-73.98, 40.75);
        let q = p.offset_deg(0.004, -0.002);
        assert_eq!(q, LonLat::new(-73.976, 40.748));
    }

    #[test]
    fn screen_point_holds_pixels() {
        let p = ScreenPoint::new(320.0, 240.5);
        assert_eq!(p.x, 320.0);
        assert_eq!(p.y, 240.5);
    }
}
