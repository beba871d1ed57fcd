//! In-memory host used by the unit tests.

use crate::error::{HostError, HostResult};
use crate::host::*;
use engine_core::{Entity, ModelHash, Vec2, Vec3, World};
use std::cell::Cell;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub(crate) struct FakeEntity {
    pub position: Vec3,
    pub rotation: Vec3,
    pub velocity: Vec3,
    pub heading: f32,
    pub health: Option<(f32, f32)>,
    pub model: ModelHash,
    pub vehicle: Option<VehicleVitals>,
}

impl FakeEntity {
    pub fn ped(model: &str, position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            velocity: Vec3::ZERO,
            heading: 0.0,
            health: Some((200.0, 200.0)),
            model: ModelHash::from_name(model),
            vehicle: None,
        }
    }

    pub fn vehicle(model: &str, position: Vec3) -> Self {
        Self {
            health: Some((1000.0, 1000.0)),
            vehicle: Some(VehicleVitals {
                engine_health: 1000.0,
                body_health: 1000.0,
                speed: 0.0,
                rpm: 0.2,
                gear: 1,
                acceleration: 0.0,
            }),
            ..Self::ped(model, position)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawCall {
    Rect { center: Vec2, size: Vec2, color: Color },
    Text { text: String, position: Vec2 },
    Crosshair(Color),
}

/// What the next raycast reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Aim {
    Nothing,
    Geometry(Vec3),
    Entity(Entity),
    /// Entity hit reported at the zero-vector sentinel.
    Degenerate(Entity),
}

pub(crate) struct FakeHost {
    world: World,
    entities: HashMap<Entity, FakeEntity>,
    pub viewer: Entity,
    pub toggle: bool,
    pub aim_held: bool,
    pub aim: Aim,
    pub raycast_fails: bool,
    pub raycasts: Cell<usize>,
    pub last_query: Cell<Option<RaycastQuery>>,
    pub camera_position: Vec3,
    pub camera_forward: Vec3,
    pub free_camera_up: Option<Vec3>,
    /// Fixed result of `world_to_screen`.
    pub projection: Option<Vec2>,
    pub draws: Vec<DrawCall>,
    pub notifications: Vec<String>,
}

impl FakeHost {
    /// A host whose viewer stands at the origin.
    pub fn new() -> Self {
        let mut world = World::new();
        let viewer = world.spawn(());
        let mut entities = HashMap::new();
        entities.insert(viewer, FakeEntity::ped("player_zero", Vec3::ZERO));
        Self {
            world,
            entities,
            viewer,
            toggle: false,
            aim_held: false,
            aim: Aim::Nothing,
            raycast_fails: false,
            raycasts: Cell::new(0),
            last_query: Cell::new(None),
            camera_position: Vec3::new(0.0, 1.6, 0.0),
            camera_forward: Vec3::X,
            free_camera_up: None,
            projection: Some(Vec2::new(0.5, 0.5)),
            draws: Vec::new(),
            notifications: Vec::new(),
        }
    }

    pub fn spawn(&mut self, entity: FakeEntity) -> Entity {
        let id = self.world.spawn(());
        self.entities.insert(id, entity);
        id
    }

    pub fn despawn(&mut self, entity: Entity) {
        let _ = self.world.despawn(entity);
        self.entities.remove(&entity);
    }

    pub fn move_to(&mut self, entity: Entity, position: Vec3) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.position = position;
        }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.draws
            .iter()
            .filter_map(|d| match d {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn crosshair(&self) -> Option<Color> {
        self.draws.iter().find_map(|d| match d {
            DrawCall::Crosshair(color) => Some(*color),
            _ => None,
        })
    }

    pub fn panel(&self) -> Option<(Vec2, Vec2)> {
        self.draws.iter().find_map(|d| match d {
            DrawCall::Rect { center, size, .. } => Some((*center, *size)),
            _ => None,
        })
    }

    fn get(&self, entity: Entity) -> HostResult<&FakeEntity> {
        self.entities.get(&entity).ok_or(HostError::EntityNotFound(entity))
    }
}

impl ControlInput for FakeHost {
    fn toggle_just_pressed(&self) -> bool {
        self.toggle
    }

    fn aim_held(&self) -> bool {
        self.aim_held
    }
}

impl SceneQuery for FakeHost {
    fn viewer(&self) -> HostResult<Entity> {
        Ok(self.viewer)
    }

    fn raycast(&self, query: &RaycastQuery) -> HostResult<RaycastResult> {
        self.raycasts.set(self.raycasts.get() + 1);
        self.last_query.set(Some(*query));
        if self.raycast_fails {
            return Err(HostError::Query("raycast backend offline".into()));
        }
        let result = match self.aim {
            Aim::Nothing => RaycastResult::miss(),
            Aim::Geometry(position) => RaycastResult {
                hit: true,
                hit_entity: false,
                position,
                entity: None,
            },
            Aim::Entity(entity) => RaycastResult {
                hit: true,
                hit_entity: true,
                position: self.get(entity)?.position,
                entity: Some(entity),
            },
            Aim::Degenerate(entity) => RaycastResult {
                hit: true,
                hit_entity: true,
                position: Vec3::ZERO,
                entity: Some(entity),
            },
        };
        Ok(result)
    }
}

impl EntityReader for FakeHost {
    fn exists(&self, entity: Entity) -> bool {
        self.entities.contains_key(&entity)
    }

    fn position(&self, entity: Entity) -> HostResult<Vec3> {
        Ok(self.get(entity)?.position)
    }

    fn rotation(&self, entity: Entity) -> HostResult<Vec3> {
        Ok(self.get(entity)?.rotation)
    }

    fn velocity(&self, entity: Entity) -> HostResult<Vec3> {
        Ok(self.get(entity)?.velocity)
    }

    fn heading(&self, entity: Entity) -> HostResult<f32> {
        Ok(self.get(entity)?.heading)
    }

    fn health(&self, entity: Entity) -> HostResult<(f32, f32)> {
        self.get(entity)?.health.ok_or(HostError::MissingComponent {
            entity,
            component: "Health",
        })
    }

    fn model(&self, entity: Entity) -> HostResult<ModelHash> {
        Ok(self.get(entity)?.model)
    }

    fn vehicle(&self, entity: Entity) -> HostResult<Option<VehicleVitals>> {
        Ok(self.get(entity)?.vehicle)
    }
}

impl Viewpoint for FakeHost {
    fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    fn camera_forward(&self) -> Vec3 {
        self.camera_forward
    }

    fn free_camera_up(&self) -> Option<Vec3> {
        self.free_camera_up
    }

    fn world_to_screen(&self, _world: Vec3) -> Option<Vec2> {
        self.projection
    }
}

impl Canvas for FakeHost {
    fn draw_rect(&mut self, center: Vec2, size: Vec2, color: Color) {
        self.draws.push(DrawCall::Rect { center, size, color });
    }

    fn draw_text(&mut self, text: &str, position: Vec2) {
        self.draws.push(DrawCall::Text {
            text: text.to_string(),
            position,
        });
    }

    fn draw_crosshair(&mut self, color: Color) {
        self.draws.push(DrawCall::Crosshair(color));
    }
}

impl Notifier for FakeHost {
    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}
