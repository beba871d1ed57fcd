//! Debugger host over the sandbox scene.

use crate::config::SandboxConfig;
use crate::scene::Scene;
use debugger::{
    Canvas, Color, ControlInput, EntityDebugger, EntityReader, FrameOutcome, HostError, HostResult,
    Notifier, RaycastQuery, RaycastResult, SceneQuery, VehicleVitals, Viewpoint,
};
use engine_core::{Entity, Health, Model, ModelHash, Time, Transform, VehicleState, Velocity, Vec2, Vec3};
use hecs::{Component, ComponentError};
use input::{Binding, ControlBindings, ElementState, InputState, KeyCode};
use physics::{Group, PhysicsBody, RaycastFilter};
use renderer::{Camera, OverlayTextBuilder};
use std::time::Duration;

/// Camera height above the player's feet.
const EYE_HEIGHT: f32 = 1.6;
/// Glyph scale for panel text (6x8 px glyphs).
const TEXT_SCALE: f32 = 1.5;
const TEXT_COLOR: Color = [1.0, 1.0, 1.0, 1.0];
/// Noclip camera speed in m/s.
const FLY_SPEED: f32 = 12.0;

/// What the debugger drew during the last frame, in normalized units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameRecord {
    pub crosshair: Option<Color>,
    /// Panel centre and size.
    pub panel: Option<(Vec2, Vec2)>,
    pub lines: Vec<String>,
}

/// Scene, cameras, input and overlay wired up as a debugger host.
pub struct Sandbox {
    pub scene: Scene,
    /// Gameplay camera; rays start here.
    pub camera: Camera,
    /// Noclip camera, when active.
    pub free_camera: Option<Camera>,
    pub input: InputState,
    pub controls: ControlBindings,
    pub overlay: OverlayTextBuilder,
    pub time: Time,
    notifications: Vec<String>,
    frame: FrameRecord,
}

impl Sandbox {
    pub fn new(scene: Scene, config: &SandboxConfig) -> Self {
        let eye = scene
            .world
            .get::<&Transform>(scene.player)
            .map(|t| t.position)
            .unwrap_or(Vec3::ZERO)
            + Vec3::Y * (EYE_HEIGHT - 0.9);
        let mut camera = Camera::new(eye);
        camera.set_aspect(config.window_width, config.window_height);
        let free_camera = config.free_camera.then(|| camera.clone());

        Self {
            scene,
            camera,
            free_camera,
            input: InputState::new(),
            controls: config.controls,
            overlay: OverlayTextBuilder::new(config.window_width as f32, config.window_height as f32),
            time: Time::new(),
            notifications: Vec::new(),
            frame: FrameRecord::default(),
        }
    }

    /// Run one debugger frame lasting `dt`.
    pub fn frame(&mut self, debugger: &mut EntityDebugger, dt: Duration) -> FrameOutcome {
        self.time.advance(dt);
        self.update_cameras();
        while self.time.should_fixed_update() {
            self.scene.physics.step(self.time.fixed_timestep_seconds());
        }

        self.overlay.clear();
        self.frame = FrameRecord::default();

        let now = self.time.elapsed();
        let outcome = debugger.on_tick(self, now);
        log::debug!(
            "Frame {}: {:?}, {} overlay quads",
            self.time.frame_count(),
            outcome,
            self.overlay.quad_count()
        );

        self.input.begin_frame();
        outcome
    }

    pub fn press(&mut self, binding: Binding) {
        self.input.process_binding(binding, ElementState::Pressed);
    }

    pub fn release(&mut self, binding: Binding) {
        self.input.process_binding(binding, ElementState::Released);
    }

    /// Mouse look for whichever camera is active; WASD/Space/Shift fly the noclip camera.
    fn update_cameras(&mut self) {
        let look = self.input.mouse_delta();
        let Some(free) = self.free_camera.as_mut() else {
            self.camera.process_mouse(look.x, look.y);
            return;
        };
        free.process_mouse(look.x, look.y);

        let axis = |positive: KeyCode, negative: KeyCode| {
            self.input.is_key_held(positive) as i32 as f32 - self.input.is_key_held(negative) as i32 as f32
        };
        let strafe = Vec2::new(axis(KeyCode::KeyD, KeyCode::KeyA), axis(KeyCode::KeyW, KeyCode::KeyS));
        let vertical = axis(KeyCode::Space, KeyCode::ShiftLeft);
        free.process_fly(strafe, vertical, FLY_SPEED, self.time.delta_seconds());
    }

    /// Queue mouse motion; cameras turn on the frame after it is latched.
    pub fn look(&mut self, delta: Vec2) {
        self.input.process_mouse_motion((delta.x as f64, delta.y as f64));
    }

    /// Turn the gameplay camera towards `target`.
    pub fn look_at(&mut self, target: Vec3) {
        self.camera.look_at(target);
    }

    pub fn last_frame(&self) -> &FrameRecord {
        &self.frame
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Camera the overlay is drawn from.
    fn active_camera(&self) -> &Camera {
        self.free_camera.as_ref().unwrap_or(&self.camera)
    }

    fn component<T: Component + Copy>(&self, entity: Entity, name: &'static str) -> HostResult<T> {
        match self.scene.world.get::<&T>(entity) {
            Ok(component) => Ok(*component),
            Err(ComponentError::NoSuchEntity) => Err(HostError::EntityNotFound(entity)),
            Err(ComponentError::MissingComponent(_)) => Err(HostError::MissingComponent {
                entity,
                component: name,
            }),
        }
    }

    fn to_pixels(&self, normalized: Vec2) -> Vec2 {
        let (w, h) = self.overlay.screen_size();
        Vec2::new(normalized.x * w, normalized.y * h)
    }
}

impl ControlInput for Sandbox {
    fn toggle_just_pressed(&self) -> bool {
        self.input.is_just_pressed(self.controls.toggle)
    }

    fn aim_held(&self) -> bool {
        self.input.is_held(self.controls.aim)
    }
}

impl SceneQuery for Sandbox {
    fn viewer(&self) -> HostResult<Entity> {
        let player = self.scene.player;
        if self.scene.world.contains(player) {
            Ok(player)
        } else {
            Err(HostError::EntityNotFound(player))
        }
    }

    fn raycast(&self, query: &RaycastQuery) -> HostResult<RaycastResult> {
        let exclude = match query.exclude {
            Some(entity) => Some(self.component::<PhysicsBody>(entity, "PhysicsBody")?.rigid_body),
            None => None,
        };
        let filter = RaycastFilter {
            mask: Group::from_bits_retain(query.mask),
            exclude,
        };
        let result = self
            .scene
            .physics
            .raycast(query.origin, query.direction, query.max_distance, filter)
            .map_or_else(RaycastResult::miss, |hit| RaycastResult {
                hit: true,
                hit_entity: hit.entity.is_some(),
                position: hit.point,
                entity: hit.entity,
            });
        Ok(result)
    }
}

impl EntityReader for Sandbox {
    fn exists(&self, entity: Entity) -> bool {
        self.scene.world.contains(entity)
    }

    fn position(&self, entity: Entity) -> HostResult<Vec3> {
        Ok(self.component::<Transform>(entity, "Transform")?.position)
    }

    fn rotation(&self, entity: Entity) -> HostResult<Vec3> {
        Ok(self.component::<Transform>(entity, "Transform")?.euler_degrees())
    }

    fn velocity(&self, entity: Entity) -> HostResult<Vec3> {
        Ok(self.component::<Velocity>(entity, "Velocity")?.linear)
    }

    fn heading(&self, entity: Entity) -> HostResult<f32> {
        Ok(self.component::<Transform>(entity, "Transform")?.heading_degrees())
    }

    fn health(&self, entity: Entity) -> HostResult<(f32, f32)> {
        let health = self.component::<Health>(entity, "Health")?;
        Ok((health.current, health.max))
    }

    fn model(&self, entity: Entity) -> HostResult<ModelHash> {
        Ok(self.component::<Model>(entity, "Model")?.hash)
    }

    fn vehicle(&self, entity: Entity) -> HostResult<Option<VehicleVitals>> {
        match self.component::<VehicleState>(entity, "VehicleState") {
            Ok(state) => Ok(Some(VehicleVitals {
                engine_health: state.engine_health,
                body_health: state.body_health,
                speed: state.speed,
                rpm: state.rpm,
                gear: state.gear,
                acceleration: state.acceleration,
            })),
            Err(HostError::MissingComponent { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl Viewpoint for Sandbox {
    fn camera_position(&self) -> Vec3 {
        self.camera.position()
    }

    fn camera_forward(&self) -> Vec3 {
        self.camera.forward()
    }

    fn free_camera_up(&self) -> Option<Vec3> {
        self.free_camera.as_ref().map(Camera::up)
    }

    fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
        self.active_camera().world_to_screen(world)
    }
}

impl Canvas for Sandbox {
    fn draw_rect(&mut self, center: Vec2, size: Vec2, color: Color) {
        let top_left = self.to_pixels(center - size * 0.5);
        let size_px = self.to_pixels(size);
        self.overlay.add_rect(top_left.x, top_left.y, size_px.x, size_px.y, color);
        self.frame.panel = Some((center, size));
    }

    fn draw_text(&mut self, text: &str, position: Vec2) {
        let at = self.to_pixels(position);
        self.overlay.add_text(at.x, at.y, text, TEXT_SCALE, TEXT_COLOR);
        self.frame.lines.push(text.to_string());
    }

    fn draw_crosshair(&mut self, color: Color) {
        let (w, h) = self.overlay.screen_size();
        self.overlay.add_crosshair(w * 0.5, h * 0.5, color);
        self.frame.crosshair = Some(color);
    }
}

impl Notifier for Sandbox {
    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debugger::{ModelRegistry, HIT_EVERYTHING};

    fn sandbox() -> (Sandbox, Entity) {
        let mut scene = Scene::new(Vec3::new(0.0, 0.9, 0.0));
        let car = scene.spawn_vehicle("adder", Vec3::new(0.0, 0.7, -12.0), 0.0);
        scene.physics.update_query_pipeline();
        (Sandbox::new(scene, &SandboxConfig::default()), car)
    }

    #[test]
    fn reads_components_through_host_traits() {
        let (sandbox, car) = sandbox();
        assert_eq!(sandbox.position(car).unwrap(), Vec3::new(0.0, 0.7, -12.0));
        assert_eq!(sandbox.model(car).unwrap(), ModelHash::from_name("adder"));
        assert_eq!(sandbox.vehicle(car).unwrap().unwrap().gear, 1);
        assert_eq!(sandbox.vehicle(sandbox.scene.player).unwrap(), None);
        assert_eq!(sandbox.health(sandbox.scene.player).unwrap(), (200.0, 200.0));
    }

    #[test]
    fn despawned_entity_reports_not_found() {
        let (mut sandbox, car) = sandbox();
        sandbox.scene.despawn(car);
        assert!(!sandbox.exists(car));
        assert!(matches!(sandbox.position(car), Err(HostError::EntityNotFound(_))));
    }

    #[test]
    fn raycast_skips_viewer_and_finds_vehicle() {
        let (mut sandbox, car) = sandbox();
        sandbox.look_at(Vec3::new(0.0, 0.7, -12.0));
        let query = RaycastQuery {
            origin: sandbox.camera_position(),
            direction: sandbox.camera_forward(),
            max_distance: 100.0,
            mask: HIT_EVERYTHING,
            exclude: Some(sandbox.viewer().unwrap()),
        };
        let result = sandbox.raycast(&query).unwrap();
        assert_eq!(result.target(), Some(car));
    }

    #[test]
    fn controls_follow_bindings() {
        let (mut sandbox, _) = sandbox();
        let toggle = sandbox.controls.toggle;
        sandbox.press(toggle);
        assert!(sandbox.toggle_just_pressed());
        sandbox.input.begin_frame();
        assert!(!sandbox.toggle_just_pressed());

        let aim = sandbox.controls.aim;
        sandbox.press(aim);
        sandbox.input.begin_frame();
        assert!(sandbox.aim_held());
        sandbox.release(aim);
        assert!(!sandbox.aim_held());
    }

    #[test]
    fn panel_is_drawn_in_pixels() {
        let (mut sandbox, car) = sandbox();
        let mut debugger = EntityDebugger::new(ModelRegistry::builtin());
        debugger.set_enabled(true);
        sandbox.look_at(Vec3::new(0.0, 0.7, -12.0));

        let outcome = sandbox.frame(&mut debugger, Duration::from_millis(16));
        assert_eq!(outcome, FrameOutcome::Rendered { rows: 16 });
        assert_eq!(debugger.target().hovered(), Some(car));

        let frame = sandbox.last_frame();
        assert_eq!(frame.lines[0], "Model Name: adder");
        let (center, size) = frame.panel.unwrap();
        // First quads: crosshair arms, then the panel rect.
        let rect = &sandbox.overlay.vertices[8..12];
        let left = (center.x - size.x * 0.5) * 2.0 - 1.0;
        let top = 1.0 - (center.y - size.y * 0.5) * 2.0;
        assert!((rect[0].position[0] - left).abs() < 1e-4);
        assert!((rect[0].position[1] - top).abs() < 1e-4);
    }

    #[test]
    fn free_camera_aims_with_its_up_vector() {
        let scene = Scene::new(Vec3::new(0.0, 0.9, 0.0));
        let config = SandboxConfig {
            free_camera: true,
            ..Default::default()
        };
        let sandbox = Sandbox::new(scene, &config);
        assert_eq!(sandbox.free_camera_up(), Some(sandbox.camera.up()));
    }

    #[test]
    fn noclip_camera_flies_and_turns_alone() {
        let scene = Scene::new(Vec3::new(0.0, 0.9, 0.0));
        let config = SandboxConfig {
            free_camera: true,
            ..Default::default()
        };
        let mut sandbox = Sandbox::new(scene, &config);
        let mut debugger = EntityDebugger::new(ModelRegistry::builtin());
        let start = sandbox.camera.position();
        let start_forward = sandbox.camera.forward();

        let forward = Binding::Key(KeyCode::KeyW);
        sandbox.press(forward);
        sandbox.look(Vec2::new(40.0, 0.0));
        sandbox.frame(&mut debugger, Duration::from_millis(500));
        sandbox.release(forward);

        let free = sandbox.free_camera.as_ref().unwrap();
        // Half a second at fly speed along the starting forward axis.
        assert!((free.position() - (start + start_forward * FLY_SPEED * 0.5)).length() < 1e-3);
        assert!((free.forward() - start_forward).length() < 1e-5);

        // The queued motion turns it on the next frame.
        sandbox.frame(&mut debugger, Duration::from_millis(16));
        let free = sandbox.free_camera.as_ref().unwrap();
        assert!((free.forward() - start_forward).length() > 1e-3);
        assert_eq!(sandbox.camera.position(), start);
        assert_eq!(sandbox.camera.forward(), start_forward);
    }
}
