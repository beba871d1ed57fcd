//! In-world entity debugger.
//!
//! Aim at an entity to inspect it, hold aim to lock onto it, and a telemetry
//! panel follows the entity on screen every frame:
//! - [`targeting`]: hover/lock state machine and crosshair raycast
//! - [`snapshot`]: ordered label/value telemetry for one entity
//! - [`layout`]: screen projection and panel geometry
//! - [`driver`]: the per-frame entry point
//!
//! The host engine plugs in through the traits in [`host`].

pub mod driver;
pub mod error;
pub mod format;
pub mod host;
pub mod layout;
pub mod models;
pub mod snapshot;
pub mod targeting;

#[cfg(test)]
pub(crate) mod testing;

pub use driver::*;
pub use error::*;
pub use host::*;
pub use layout::*;
pub use models::*;
pub use snapshot::*;
pub use targeting::*;
