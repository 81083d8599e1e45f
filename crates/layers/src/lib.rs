pub mod compositor;
pub mod rings;
pub mod symbology;

pub use compositor::*;
pub use rings::{RingConfig, pulse_rings};
pub use symbology::Palette;
