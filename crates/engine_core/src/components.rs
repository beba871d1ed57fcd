//! Common ECS components used across the scene.

use glam::Vec3;
use std::fmt;

/// Velocity component for moving entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3) -> Self {
        Self { linear }
    }
}

/// Health component for damageable entities.
#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }
}

/// Tag component for the player entity (the viewing actor).
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// 32-bit model identifier.
///
/// Model tables key names by the Jenkins one-at-a-time hash of the lowercase
/// name, so `ModelHash::from_name("Adder") == ModelHash::from_name("adder")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModelHash(pub u32);

impl ModelHash {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Hash a model name.
    pub fn from_name(name: &str) -> Self {
        let mut hash: u32 = 0;
        for byte in name.bytes() {
            hash = hash.wrapping_add(byte.to_ascii_lowercase() as u32);
            hash = hash.wrapping_add(hash << 10);
            hash ^= hash >> 6;
        }
        hash = hash.wrapping_add(hash << 3);
        hash ^= hash >> 11;
        hash = hash.wrapping_add(hash << 15);
        Self(hash)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// The hash reinterpreted as a signed integer, as hosts usually print it.
    pub fn signed(self) -> i32 {
        self.0 as i32
    }
}

impl fmt::Display for ModelHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Model reference component - which model an entity was spawned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Model {
    pub hash: ModelHash,
}

impl Model {
    pub fn new(hash: ModelHash) -> Self {
        Self { hash }
    }

    pub fn named(name: &str) -> Self {
        Self::new(ModelHash::from_name(name))
    }
}

/// Drive-train and damage state carried only by vehicles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    /// Engine health, 0..=1000.
    pub engine_health: f32,
    /// Body health, 0..=1000.
    pub body_health: f32,
    /// Forward speed in internal units.
    pub speed: f32,
    /// Normalized engine RPM (0.2 at idle, 1.0 at the limiter).
    pub rpm: f32,
    pub gear: i32,
    pub acceleration: f32,
}

impl VehicleState {
    pub const MAX_HEALTH: f32 = 1000.0;
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            engine_health: Self::MAX_HEALTH,
            body_health: Self::MAX_HEALTH,
            speed: 0.0,
            rpm: 0.2,
            gear: 1,
            acceleration: 0.0,
        }
    }
}
