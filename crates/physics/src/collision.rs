//! Collision groups, filtering, and the collider ↔ entity link.

use engine_core::Entity;
use rapier3d::prelude::*;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (ground, walls)
    Environment = 1 << 0,
    /// Pedestrians, including the player
    Actor = 1 << 1,
    /// Vehicles
    Vehicle = 1 << 2,
    /// Props and loose objects
    Prop = 1 << 3,
}

impl CollisionGroup {
    /// Membership bits for this group; collides with everything.
    pub fn groups(self) -> InteractionGroups {
        InteractionGroups::new(Group::from_bits_retain(self as u32), Group::ALL)
    }
}

/// Component linking an ECS entity to its physics handles.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub rigid_body: RigidBodyHandle,
    pub collider: Option<ColliderHandle>,
}

impl PhysicsBody {
    pub fn with_collider(rigid_body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Self {
            rigid_body,
            collider: Some(collider),
        }
    }
}

/// Pack an entity id into collider user data. Zero means "world geometry".
pub fn entity_to_user_data(entity: Entity) -> u128 {
    entity.to_bits().get() as u128
}

/// Recover the entity stored by [`entity_to_user_data`], if any.
pub fn entity_from_user_data(user_data: u128) -> Option<Entity> {
    u64::try_from(user_data).ok().and_then(Entity::from_bits)
}
