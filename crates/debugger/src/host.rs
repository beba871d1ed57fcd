//! Interfaces the host engine implements for the debugger.
//!
//! Every call is synchronous and scoped to the current frame. Entities are
//! plain ids; the scene owns their lifetime and the debugger only checks
//! [`EntityReader::exists`] before trusting one.

use crate::error::HostResult;
use engine_core::{Entity, ModelHash, Vec2, Vec3};

/// RGBA color, components in 0..=1.
pub type Color = [f32; 4];

/// Raycast mask accepting every collision group.
pub const HIT_EVERYTHING: u32 = u32::MAX;

/// A forward ray into the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastQuery {
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
    /// Collision-group bits the ray tests against.
    pub mask: u32,
    /// Actor the ray passes through (the viewer itself).
    pub exclude: Option<Entity>,
}

/// Raw outcome of a [`RaycastQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RaycastResult {
    /// The ray hit anything at all.
    pub hit: bool,
    /// The thing hit was an entity rather than world geometry.
    pub hit_entity: bool,
    pub position: Vec3,
    pub entity: Option<Entity>,
}

impl RaycastResult {
    pub fn miss() -> Self {
        Self::default()
    }

    /// The entity under the ray, if this counts as an entity hit.
    ///
    /// A zero hit position is the host's "no data" sentinel and is rejected.
    pub fn target(&self) -> Option<Entity> {
        if !self.hit || !self.hit_entity || self.position == Vec3::ZERO {
            return None;
        }
        self.entity
    }
}

/// Vehicle-only readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleVitals {
    pub engine_health: f32,
    pub body_health: f32,
    /// Speed in internal units.
    pub speed: f32,
    pub rpm: f32,
    pub gear: i32,
    pub acceleration: f32,
}

/// Control polling.
pub trait ControlInput {
    /// Toggle control went down this frame.
    fn toggle_just_pressed(&self) -> bool;
    /// Aim control is currently held.
    fn aim_held(&self) -> bool;
}

/// Scene-wide queries.
pub trait SceneQuery {
    /// The actor whose view is being debugged (distances are measured from it).
    fn viewer(&self) -> HostResult<Entity>;
    fn raycast(&self, query: &RaycastQuery) -> HostResult<RaycastResult>;
}

/// Per-entity attribute reads.
pub trait EntityReader {
    fn exists(&self, entity: Entity) -> bool;
    fn position(&self, entity: Entity) -> HostResult<Vec3>;
    /// Euler rotation in degrees.
    fn rotation(&self, entity: Entity) -> HostResult<Vec3>;
    fn velocity(&self, entity: Entity) -> HostResult<Vec3>;
    /// Heading in degrees.
    fn heading(&self, entity: Entity) -> HostResult<f32>;
    /// `(current, max)` health.
    fn health(&self, entity: Entity) -> HostResult<(f32, f32)>;
    fn model(&self, entity: Entity) -> HostResult<ModelHash>;
    /// `Some` iff the entity is a vehicle.
    fn vehicle(&self, entity: Entity) -> HostResult<Option<VehicleVitals>>;
}

/// Camera state and projection.
pub trait Viewpoint {
    fn camera_position(&self) -> Vec3;
    fn camera_forward(&self) -> Vec3;
    /// Up vector of the free (noclip) camera while it is active.
    fn free_camera_up(&self) -> Option<Vec3>;
    /// Normalized screen position, or `None` when the point cannot be projected.
    fn world_to_screen(&self, world: Vec3) -> Option<Vec2>;
}

/// Overlay drawing in normalized screen units.
pub trait Canvas {
    /// Rectangle centred on `center`.
    fn draw_rect(&mut self, center: Vec2, size: Vec2, color: Color);
    fn draw_text(&mut self, text: &str, position: Vec2);
    fn draw_crosshair(&mut self, color: Color);
}

/// Fire-and-forget user notifications.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Everything the frame driver needs from its host.
pub trait DebugHost: ControlInput + SceneQuery + EntityReader + Viewpoint + Canvas + Notifier {}

impl<T> DebugHost for T where T: ControlInput + SceneQuery + EntityReader + Viewpoint + Canvas + Notifier {}
