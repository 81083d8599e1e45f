pub mod feature;
pub mod geojson;
pub mod store;

pub use feature::*;
pub use geojson::GeoJsonError;
pub use store::*;
