//! Scripted session: lock onto a vehicle, look away, and watch the lock drop
//! once the vehicle drives out of tracking range.

use crate::config::SandboxConfig;
use crate::host::Sandbox;
use crate::scene::Scene;
use anyhow::{bail, Result};
use debugger::{EntityDebugger, FrameOutcome};
use engine_core::{Entity, Transform, Vec2, Vec3};
use input::{Binding, KeyCode};
use std::time::Duration;

/// Scripted frame length (60 Hz).
pub const FRAME: Duration = Duration::from_micros(16_667);
/// How fast the vehicle leaves, in m/s along +X.
const DRIVE_VELOCITY: Vec3 = Vec3::new(15.0, 0.0, 0.0);
/// Give up if the lock has not dropped after this many driving frames.
const MAX_DRIVE_FRAMES: u32 = 600;

/// Mouse motion fed to the noclip camera before the script starts.
const FREE_LOOK: Vec2 = Vec2::new(-30.0, 10.0);

const PLAYER_START: Vec3 = Vec3::new(0.0, 0.9, 0.0);
const VEHICLE_START: Vec3 = Vec3::new(0.0, 0.7, -12.0);

/// The demo scene with the entities the script refers to.
pub struct Session {
    pub sandbox: Sandbox,
    pub debugger: EntityDebugger,
    pub vehicle: Entity,
    pub ped: Entity,
    pub prop: Entity,
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub frames: u64,
    pub rendered_frames: u64,
    /// Vehicle position on the frame the lock dropped.
    pub lost_at: Vec3,
    pub notifications: Vec<String>,
}

impl Session {
    pub fn new(config: &SandboxConfig) -> Self {
        let mut scene = Scene::new(PLAYER_START);
        let vehicle = scene.spawn_vehicle("adder", VEHICLE_START, 0.0);
        let ped = scene.spawn_ped("a_m_m_business_01", Vec3::new(-4.0, 0.9, -8.0));
        let prop = scene.spawn_prop("prop_bin_01a", Vec3::new(4.0, 0.5, -6.0));
        scene.add_wall(Vec3::new(0.0, 2.0, -25.0), 0.0, Vec3::new(10.0, 2.0, 0.5));
        scene.physics.update_query_pipeline();

        let mut debugger = EntityDebugger::new(config.model_registry()).with_backoff(config.error_backoff());
        debugger.set_enabled(config.start_enabled);

        Self {
            sandbox: Sandbox::new(scene, config),
            debugger,
            vehicle,
            ped,
            prop,
        }
    }

    pub fn step(&mut self) -> FrameOutcome {
        self.sandbox.frame(&mut self.debugger, FRAME)
    }

    /// Press the toggle for one frame.
    pub fn toggle(&mut self) -> FrameOutcome {
        let toggle = self.sandbox.controls.toggle;
        self.sandbox.press(toggle);
        let outcome = self.step();
        self.sandbox.release(toggle);
        outcome
    }

    fn position_of(&self, entity: Entity) -> Result<Vec3> {
        Ok(self.sandbox.scene.world.get::<&Transform>(entity)?.position)
    }

    /// Run the whole script.
    pub fn run(&mut self) -> Result<SessionReport> {
        let mut rendered = 0;
        let mut count = |outcome: FrameOutcome| {
            if matches!(outcome, FrameOutcome::Rendered { .. }) {
                rendered += 1;
            }
            outcome
        };

        if self.sandbox.free_camera.is_some() {
            let forward = Binding::Key(KeyCode::KeyW);
            self.sandbox.press(forward);
            self.sandbox.look(FREE_LOOK);
            count(self.step());
            self.sandbox.release(forward);
            let outcome = count(self.step());
            if let Some(free) = &self.sandbox.free_camera {
                log::info!(
                    "Free camera at {:?} (aiming along its up vector): {:?}",
                    free.position(),
                    outcome
                );
            }
            self.sandbox.free_camera = None;
        }

        if !self.debugger.is_enabled() {
            count(self.toggle());
        }
        log::info!("Debugger enabled: {}", self.debugger.is_enabled());

        let aim = self.sandbox.controls.aim;
        self.sandbox.look_at(self.position_of(self.vehicle)?);
        self.sandbox.press(aim);
        let outcome = count(self.step());
        self.sandbox.release(aim);
        if !self.debugger.target().is_locked() {
            bail!("expected a lock on the vehicle, got {:?}", outcome);
        }
        log::info!("Locked onto vehicle: {:?}", outcome);
        for line in &self.sandbox.last_frame().lines {
            log::info!("  {}", line);
        }

        let elsewhere = self.position_of(self.prop)? + Vec3::new(20.0, 5.0, 0.0);
        self.sandbox.look_at(elsewhere);
        let outcome = count(self.step());
        log::info!("Looked away, lock held: {:?}", outcome);

        let dt = FRAME.as_secs_f32();
        let mut lost_at = None;
        for _ in 0..MAX_DRIVE_FRAMES {
            self.sandbox.scene.drive_vehicle(self.vehicle, DRIVE_VELOCITY, dt)?;
            if count(self.step()) == FrameOutcome::TargetLost {
                lost_at = Some(self.position_of(self.vehicle)?);
                break;
            }
        }
        let Some(lost_at) = lost_at else {
            bail!("lock never dropped while the vehicle drove away");
        };
        log::info!("Lock dropped with the vehicle at {:?}", lost_at);

        let outcome = count(self.step());
        log::info!("After the drop: {:?}", outcome);

        self.sandbox.look_at(self.position_of(self.ped)?);
        let outcome = count(self.step());
        log::info!("Hovering ped: {:?}", outcome);
        self.sandbox.scene.despawn(self.ped);
        let outcome = count(self.step());
        log::info!("Ped despawned: {:?}", outcome);

        count(self.toggle());

        Ok(SessionReport {
            frames: self.sandbox.time.frame_count(),
            rendered_frames: rendered,
            lost_at,
            notifications: self.sandbox.notifications().to_vec(),
        })
    }
}
