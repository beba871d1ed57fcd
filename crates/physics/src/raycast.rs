//! Raycasting for aim queries.

use crate::collision::entity_from_user_data;
use crate::PhysicsWorld;
use engine_core::{Entity, Vec3};
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Entity owning the collider, or `None` for world geometry.
    pub entity: Option<Entity>,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

/// Which colliders a ray may hit.
#[derive(Debug, Clone, Copy)]
pub struct RaycastFilter {
    /// Collision groups the ray tests against.
    pub mask: Group,
    /// Body ignored by the ray (typically the caster's own body).
    pub exclude: Option<RigidBodyHandle>,
}

impl Default for RaycastFilter {
    fn default() -> Self {
        Self {
            mask: Group::ALL,
            exclude: None,
        }
    }
}

impl PhysicsWorld {
    /// Cast a ray and return the first hit. `direction` need not be normalized.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: RaycastFilter,
    ) -> Option<RaycastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        let mut query_filter =
            QueryFilter::default().groups(InteractionGroups::new(Group::ALL, filter.mask));
        if let Some(body) = filter.exclude {
            query_filter = query_filter.exclude_rigid_body(body);
        }

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                query_filter,
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                let entity = self
                    .collider_set
                    .get(collider)
                    .and_then(|c| entity_from_user_data(c.user_data));
                RaycastHit {
                    collider,
                    entity,
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                }
            })
    }
}
