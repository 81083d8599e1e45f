use foundation::geo::ScreenPoint;

/// The currently highlighted deployment site and its on-screen anchor,
/// consumed by the popup presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub site: String,
    pub anchor: ScreenPoint,
}

impl Selection {
    pub fn new(site: impl Into<String>, anchor: ScreenPoint) -> Self {
        Self {
            site: site.into(),
            anchor,
        }
    }
}
