pub mod camera;
pub mod controller;
pub mod selection;
pub mod surface;

pub use camera::*;
pub use controller::*;
pub use selection::*;
pub use surface::*;
