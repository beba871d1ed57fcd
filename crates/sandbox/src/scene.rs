//! Sandbox scene: an ECS world mirrored into the physics world.

use engine_core::{Entity, Health, Model, Player, Quat, Transform, VehicleState, Velocity, Vec3, World};
use hecs::{Component, ComponentError};
use physics::{CollisionGroup, PhysicsBody, PhysicsWorld};

const PED_HALF_HEIGHT: f32 = 0.6;
const PED_RADIUS: f32 = 0.3;
const PED_HEALTH: f32 = 200.0;
const VEHICLE_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 0.7, 2.2);
const PROP_HALF_EXTENTS: Vec3 = Vec3::new(0.3, 0.5, 0.3);
const PROP_HEALTH: f32 = 1000.0;

/// Every actor, vehicle and prop, plus the static geometry they sit in.
pub struct Scene {
    pub world: World,
    pub physics: PhysicsWorld,
    /// The player ped; distances are measured from it.
    pub player: Entity,
}

impl Scene {
    /// Ground plane and a player standing at `player_position`.
    pub fn new(player_position: Vec3) -> Self {
        let mut physics = PhysicsWorld::new();
        physics.add_ground_plane();
        let mut scene = Self {
            world: World::new(),
            physics,
            player: Entity::DANGLING,
        };
        scene.player = scene.spawn_ped("player_zero", player_position);
        scene.attach(scene.player, Player);
        scene.physics.update_query_pipeline();
        scene
    }

    pub fn spawn_ped(&mut self, model: &str, position: Vec3) -> Entity {
        let entity = self.world.spawn((
            Transform::from_position(position),
            Velocity::default(),
            Model::named(model),
            Health::new(PED_HEALTH),
        ));
        let body = self.physics.add_kinematic_body(position);
        let collider =
            self.physics
                .add_entity_capsule_collider(body, PED_HALF_HEIGHT, PED_RADIUS, entity);
        self.attach(entity, PhysicsBody::with_collider(body, collider));
        log::debug!("Spawned ped {} as {:?}", model, entity);
        entity
    }

    /// Vehicle facing `heading` radians around Y.
    pub fn spawn_vehicle(&mut self, model: &str, position: Vec3, heading: f32) -> Entity {
        let transform = Transform::from_position_rotation(position, Quat::from_rotation_y(heading));
        let entity = self.world.spawn((
            transform,
            Velocity::default(),
            Model::named(model),
            Health::new(VehicleState::MAX_HEALTH),
            VehicleState::default(),
        ));
        self.attach_box(entity, &transform, VEHICLE_HALF_EXTENTS, CollisionGroup::Vehicle);
        log::debug!("Spawned vehicle {} as {:?}", model, entity);
        entity
    }

    pub fn spawn_prop(&mut self, model: &str, position: Vec3) -> Entity {
        let transform = Transform::from_position(position);
        let entity = self.world.spawn((
            transform,
            Velocity::default(),
            Model::named(model),
            Health::new(PROP_HEALTH),
        ));
        self.attach_box(entity, &transform, PROP_HALF_EXTENTS, CollisionGroup::Prop);
        log::debug!("Spawned prop {} as {:?}", model, entity);
        entity
    }

    /// Static wall; hits on it are world geometry.
    pub fn add_wall(&mut self, center: Vec3, rotation_y: f32, half_extents: Vec3) {
        self.physics.add_static_cuboid(center, rotation_y, half_extents);
    }

    fn attach_box(&mut self, entity: Entity, transform: &Transform, half_extents: Vec3, group: CollisionGroup) {
        let body = self.physics.add_kinematic_body(transform.position);
        let collider = self.physics.add_entity_box_collider(body, half_extents, group, entity);
        self.physics.set_kinematic_transform(body, transform);
        self.attach(entity, PhysicsBody::with_collider(body, collider));
    }

    fn attach(&mut self, entity: Entity, component: impl Component) {
        if let Err(err) = self.world.insert_one(entity, component) {
            log::warn!("Could not attach component to {:?}: {}", entity, err);
        }
    }

    /// Teleport an entity, keeping its collider in step.
    pub fn move_entity(&mut self, entity: Entity, position: Vec3) -> Result<(), ComponentError> {
        let transform = {
            let mut transform = self.world.get::<&mut Transform>(entity)?;
            transform.position = position;
            *transform
        };
        let body = self.world.get::<&PhysicsBody>(entity)?.rigid_body;
        self.physics.set_kinematic_transform(body, &transform);
        self.physics.update_query_pipeline();
        Ok(())
    }

    /// Move a vehicle by `velocity * dt` and update its telemetry to match.
    pub fn drive_vehicle(&mut self, entity: Entity, velocity: Vec3, dt: f32) -> Result<(), ComponentError> {
        let position = {
            let transform = self.world.get::<&Transform>(entity)?;
            transform.position + velocity * dt
        };
        {
            let mut state = self.world.get::<&mut VehicleState>(entity)?;
            let speed = velocity.length();
            state.acceleration = if dt > 0.0 { (speed - state.speed) / dt } else { 0.0 };
            state.speed = speed;
            state.rpm = (0.2 + speed / 40.0).min(1.0);
            state.gear = (1 + (speed / 10.0) as i32).min(6);
        }
        *self.world.get::<&mut Velocity>(entity)? = Velocity::new(velocity);
        self.move_entity(entity, position)
    }

    pub fn despawn(&mut self, entity: Entity) {
        let body = self.world.get::<&PhysicsBody>(entity).map(|b| b.rigid_body);
        if let Ok(body) = body {
            self.physics.remove_body(body);
            self.physics.update_query_pipeline();
        }
        if self.world.despawn(entity).is_ok() {
            log::debug!("Despawned {:?}", entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::RaycastFilter;

    #[test]
    fn spawned_entities_carry_their_tags() {
        let mut scene = Scene::new(Vec3::ZERO);
        let car = scene.spawn_vehicle("adder", Vec3::new(0.0, 0.7, -10.0), 0.0);
        let ped = scene.spawn_ped("a_m_m_business_01", Vec3::new(3.0, 0.9, 0.0));
        let bin = scene.spawn_prop("prop_bin_01a", Vec3::new(-3.0, 0.5, 0.0));

        assert!(scene.world.get::<&Player>(scene.player).is_ok());
        assert!(scene.world.get::<&Player>(ped).is_err());
        for entity in [scene.player, car, ped, bin] {
            let body = *scene.world.get::<&PhysicsBody>(entity).unwrap();
            assert!(body.collider.is_some());
        }
    }

    #[test]
    fn spawned_entities_are_hit_by_raycasts() {
        let mut scene = Scene::new(Vec3::ZERO);
        let car = scene.spawn_vehicle("adder", Vec3::new(0.0, 0.7, -10.0), 0.0);
        scene.physics.update_query_pipeline();

        let hit = scene
            .physics
            .raycast(Vec3::new(0.0, 0.7, 0.0), Vec3::NEG_Z, 100.0, RaycastFilter::default())
            .unwrap();
        // The ray starts inside the player's capsule, so it is hit first unless excluded.
        assert_eq!(hit.entity, Some(scene.player));

        let player_body = scene.world.get::<&PhysicsBody>(scene.player).unwrap().rigid_body;
        let filter = RaycastFilter {
            exclude: Some(player_body),
            ..Default::default()
        };
        let hit = scene
            .physics
            .raycast(Vec3::new(0.0, 0.7, 0.0), Vec3::NEG_Z, 100.0, filter)
            .unwrap();
        assert_eq!(hit.entity, Some(car));
        assert!((hit.distance - 7.8).abs() < 1e-3);
    }

    #[test]
    fn driving_moves_collider_and_updates_state() {
        let mut scene = Scene::new(Vec3::ZERO);
        let car = scene.spawn_vehicle("adder", Vec3::new(0.0, 0.7, -10.0), 0.0);
        scene.drive_vehicle(car, Vec3::new(20.0, 0.0, 0.0), 0.5).unwrap();

        let position = scene.world.get::<&Transform>(car).unwrap().position;
        assert_eq!(position, Vec3::new(10.0, 0.7, -10.0));
        let state = *scene.world.get::<&VehicleState>(car).unwrap();
        assert_eq!(state.speed, 20.0);
        assert_eq!(state.gear, 3);
        let velocity = *scene.world.get::<&Velocity>(car).unwrap();
        assert_eq!(velocity.linear, Vec3::new(20.0, 0.0, 0.0));

        let hit = scene.physics.raycast(
            Vec3::new(0.0, 0.7, -10.0),
            Vec3::NEG_Z,
            5.0,
            RaycastFilter {
                mask: CollisionGroup::Vehicle.groups().memberships,
                exclude: None,
            },
        );
        assert!(hit.is_none());
    }

    #[test]
    fn despawn_removes_collider() {
        let mut scene = Scene::new(Vec3::ZERO);
        let bin = scene.spawn_prop("prop_bin_01a", Vec3::new(3.0, 0.5, 0.0));
        scene.physics.update_query_pipeline();
        scene.despawn(bin);
        assert!(!scene.world.contains(bin));
        let hit = scene.physics.raycast(
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::X,
            10.0,
            RaycastFilter {
                mask: CollisionGroup::Prop.groups().memberships,
                exclude: None,
            },
        );
        assert!(hit.is_none());
    }
}
