//! Camera projection and screen-space overlay geometry.

pub mod camera;
pub mod overlay;

pub use camera::*;
pub use overlay::*;
