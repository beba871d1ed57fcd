//! Hover/lock targeting.
//!
//! Each frame the target is (re)acquired from a crosshair raycast, optionally
//! locked, and dropped once it despawns or strays too far from the viewer.
//! A lock keeps the target while the crosshair drifts; re-aiming at nothing
//! releases it.

use crate::error::HostResult;
use crate::host::{Color, EntityReader, RaycastQuery, SceneQuery, Viewpoint, HIT_EVERYTHING};
use engine_core::{Entity, Vec3};

/// Crosshair raycast reach in meters.
pub const MAX_AIM_DISTANCE: f32 = 100.0;
/// Squared viewer distance past which a target is dropped (about 31.6 m).
pub const MAX_TRACK_DISTANCE_SQUARED: f32 = 1000.0;

pub const IDLE_CROSSHAIR: Color = [120.0 / 255.0, 120.0 / 255.0, 120.0 / 255.0, 1.0];
pub const ACTIVE_CROSSHAIR: Color = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPhase {
    Idle,
    Hovering,
    Locked,
}

/// Current target. `locked` implies `hovered.is_some()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetState {
    hovered: Option<Entity>,
    locked: bool,
}

impl TargetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<Entity> {
        self.hovered
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn phase(&self) -> TargetPhase {
        match (self.hovered, self.locked) {
            (None, _) => TargetPhase::Idle,
            (Some(_), false) => TargetPhase::Hovering,
            (Some(_), true) => TargetPhase::Locked,
        }
    }

    pub fn clear(&mut self) {
        self.hovered = None;
        self.locked = false;
    }

    pub fn crosshair_color(&self) -> Color {
        if self.hovered.is_some() {
            ACTIVE_CROSSHAIR
        } else {
            IDLE_CROSSHAIR
        }
    }

    /// Re-acquire from the crosshair.
    ///
    /// While aim is held the raycast runs every frame and a miss releases the
    /// lock. Otherwise the crosshair is only scanned when there is nothing
    /// hovered or locked.
    pub fn acquire<H>(&mut self, host: &H, aim_held: bool) -> HostResult<()>
    where
        H: SceneQuery + Viewpoint + ?Sized,
    {
        let mut scanned = false;
        if aim_held {
            self.hovered = entity_in_crosshair(host)?;
            if self.hovered.is_none() {
                self.locked = false;
            }
            scanned = true;
        }

        // A second cast in the same frame would see the same scene.
        if self.hovered.is_none() && !self.locked && !scanned {
            self.hovered = entity_in_crosshair(host)?;
        }

        if let Some(entity) = self.hovered {
            log::trace!("Hovering {:?} (locked: {})", entity, self.locked);
        }
        Ok(())
    }

    /// Lock onto the hovered entity while aim is held.
    pub fn engage_lock(&mut self, aim_held: bool) {
        if aim_held && self.hovered.is_some() && !self.locked {
            log::debug!("Locked onto {:?}", self.hovered);
            self.locked = true;
        }
    }

    /// The target if it still exists and is within tracking range; otherwise
    /// clears the state and returns `None`.
    pub fn validate<H>(&mut self, host: &H) -> HostResult<Option<Entity>>
    where
        H: SceneQuery + EntityReader + ?Sized,
    {
        let Some(entity) = self.hovered else {
            return Ok(None);
        };

        if host.exists(entity) {
            let viewer_position = host.position(host.viewer()?)?;
            let position = host.position(entity)?;
            if viewer_position.distance_squared(position) <= MAX_TRACK_DISTANCE_SQUARED {
                return Ok(Some(entity));
            }
            log::debug!("Target {:?} out of range", entity);
        } else {
            log::debug!("Target {:?} despawned", entity);
        }

        self.clear();
        Ok(None)
    }
}

/// Direction the crosshair points: the camera's forward, or the free camera's
/// up vector while the free camera is active.
pub fn aim_direction<H: Viewpoint + ?Sized>(host: &H) -> Vec3 {
    host.free_camera_up().unwrap_or_else(|| host.camera_forward())
}

/// Entity under the crosshair, ignoring world geometry and the viewer itself.
pub fn entity_in_crosshair<H>(host: &H) -> HostResult<Option<Entity>>
where
    H: SceneQuery + Viewpoint + ?Sized,
{
    let query = RaycastQuery {
        origin: host.camera_position(),
        direction: aim_direction(host),
        max_distance: MAX_AIM_DISTANCE,
        mask: HIT_EVERYTHING,
        exclude: Some(host.viewer()?),
    };
    Ok(host.raycast(&query)?.target())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Aim, FakeEntity, FakeHost};

    /// One frame of targeting without the drawing.
    fn step(state: &mut TargetState, host: &FakeHost) -> Option<Entity> {
        state.acquire(host, host.aim_held).unwrap();
        state.engage_lock(host.aim_held);
        state.validate(host).unwrap()
    }

    fn host_with_car(at: Vec3) -> (FakeHost, Entity) {
        let mut host = FakeHost::new();
        let car = host.spawn(FakeEntity::vehicle("adder", at));
        (host, car)
    }

    #[test]
    fn starts_idle() {
        let state = TargetState::new();
        assert_eq!(state.phase(), TargetPhase::Idle);
        assert_eq!(state.crosshair_color(), IDLE_CROSSHAIR);
    }

    #[test]
    fn idle_scan_hovers_without_locking() {
        let (mut host, car) = host_with_car(Vec3::new(10.0, 0.0, 0.0));
        host.aim = Aim::Entity(car);
        let mut state = TargetState::new();
        assert_eq!(step(&mut state, &host), Some(car));
        assert_eq!(state.phase(), TargetPhase::Hovering);
        assert_eq!(state.crosshair_color(), ACTIVE_CROSSHAIR);
    }

    #[test]
    fn aim_held_locks_and_lock_survives_drift() {
        let (mut host, car) = host_with_car(Vec3::new(10.0, 0.0, 0.0));
        host.aim = Aim::Entity(car);
        host.aim_held = true;
        let mut state = TargetState::new();
        step(&mut state, &host);
        assert_eq!(state.phase(), TargetPhase::Locked);

        host.aim_held = false;
        host.aim = Aim::Nothing;
        let casts = host.raycasts.get();
        for _ in 0..5 {
            assert_eq!(step(&mut state, &host), Some(car));
        }
        assert_eq!(state.phase(), TargetPhase::Locked);
        assert_eq!(host.raycasts.get(), casts, "locked state must not rescan");
    }

    #[test]
    fn reaim_miss_clears_hover_and_lock() {
        let (mut host, car) = host_with_car(Vec3::new(10.0, 0.0, 0.0));
        host.aim = Aim::Entity(car);
        host.aim_held = true;
        let mut state = TargetState::new();
        step(&mut state, &host);
        assert!(state.is_locked());

        host.aim = Aim::Nothing;
        assert_eq!(step(&mut state, &host), None);
        assert_eq!(state.phase(), TargetPhase::Idle);
        assert_eq!(host.raycasts.get(), 2, "a miss while aiming casts once");
    }

    #[test]
    fn reaim_hit_moves_lock_to_new_entity() {
        let (mut host, car) = host_with_car(Vec3::new(10.0, 0.0, 0.0));
        let ped = host.spawn(FakeEntity::ped("a_m_m_business_01", Vec3::new(0.0, 0.0, 5.0)));
        host.aim = Aim::Entity(car);
        host.aim_held = true;
        let mut state = TargetState::new();
        step(&mut state, &host);
        host.aim = Aim::Entity(ped);
        assert_eq!(step(&mut state, &host), Some(ped));
        assert_eq!(state.phase(), TargetPhase::Locked);
    }

    #[test]
    fn world_geometry_hit_is_not_a_target() {
        let mut host = FakeHost::new();
        host.aim = Aim::Geometry(Vec3::new(5.0, 1.0, 0.0));
        assert_eq!(entity_in_crosshair(&host).unwrap(), None);
        host.aim_held = true;
        let mut state = TargetState::new();
        assert_eq!(step(&mut state, &host), None);
        assert_eq!(state.phase(), TargetPhase::Idle);
    }

    #[test]
    fn zero_hit_position_is_rejected() {
        let (mut host, car) = host_with_car(Vec3::new(10.0, 0.0, 0.0));
        host.aim = Aim::Degenerate(car);
        assert_eq!(entity_in_crosshair(&host).unwrap(), None);
    }

    #[test]
    fn hover_sticks_until_invalidated() {
        let (mut host, car) = host_with_car(Vec3::new(10.0, 0.0, 0.0));
        host.aim = Aim::Entity(car);
        let mut state = TargetState::new();
        step(&mut state, &host);
        host.aim = Aim::Nothing;
        assert_eq!(step(&mut state, &host), Some(car));
        assert_eq!(state.phase(), TargetPhase::Hovering);
    }

    #[test]
    fn lock_drops_past_tracking_radius() {
        let (mut host, car) = host_with_car(Vec3::new(10.0, 0.0, 0.0));
        host.aim = Aim::Entity(car);
        host.aim_held = true;
        let mut state = TargetState::new();
        assert_eq!(step(&mut state, &host), Some(car));
        assert!(state.is_locked());

        host.aim_held = false;
        host.aim = Aim::Nothing;
        host.move_to(car, Vec3::new(40.0, 0.0, 0.0));
        assert_eq!(step(&mut state, &host), None);
        assert_eq!(state.phase(), TargetPhase::Idle);
    }

    #[test]
    fn tracking_radius_is_inclusive() {
        let (mut host, car) = host_with_car(Vec3::new(30.0, 10.0, 0.0));
        host.aim = Aim::Entity(car);
        host.aim_held = true;
        let mut state = TargetState::new();
        assert_eq!(step(&mut state, &host), Some(car));

        host.aim_held = false;
        host.move_to(car, Vec3::new(30.0, 10.0, 1.0));
        assert_eq!(step(&mut state, &host), None);
    }

    #[test]
    fn despawned_target_is_dropped() {
        let (mut host, car) = host_with_car(Vec3::new(10.0, 0.0, 0.0));
        host.aim = Aim::Entity(car);
        host.aim_held = true;
        let mut state = TargetState::new();
        step(&mut state, &host);

        host.aim_held = false;
        host.aim = Aim::Nothing;
        host.despawn(car);
        assert_eq!(state.validate(&host).unwrap(), None);
        assert_eq!(state.phase(), TargetPhase::Idle);
    }

    #[test]
    fn query_starts_at_camera_and_skips_viewer() {
        let host = FakeHost::new();
        entity_in_crosshair(&host).unwrap();
        let query = host.last_query.get().unwrap();
        assert_eq!(query.origin, host.camera_position);
        assert_eq!(query.direction, Vec3::X);
        assert_eq!(query.max_distance, 100.0);
        assert_eq!(query.mask, HIT_EVERYTHING);
        assert_eq!(query.exclude, Some(host.viewer));
    }

    #[test]
    fn free_camera_aims_along_its_up_vector() {
        let mut host = FakeHost::new();
        host.free_camera_up = Some(Vec3::new(0.0, 0.0, -1.0));
        entity_in_crosshair(&host).unwrap();
        assert_eq!(host.last_query.get().unwrap().direction, Vec3::new(0.0, 0.0, -1.0));
    }
}
