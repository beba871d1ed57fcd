//! Per-frame entry point.

use crate::error::HostResult;
use crate::host::DebugHost;
use crate::layout::{layout_panel, PANEL_COLOR};
use crate::models::ModelRegistry;
use crate::snapshot::build_snapshot;
use crate::targeting::TargetState;
use engine_core::Entity;
use std::time::Duration;

/// Pause after a failed frame before the next one is attempted.
pub const ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// What a call to [`EntityDebugger::on_tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Backing off after an earlier fault; nothing ran.
    Suspended,
    Disabled,
    /// Crosshair drawn, nothing targeted.
    NoTarget,
    /// The target despawned or left tracking range this frame.
    TargetLost,
    /// Panel drawn with this many rows.
    Rendered { rows: usize },
    /// The frame failed and the back-off started.
    Faulted,
}

/// Resume point for the cooperative back-off, on the host's frame clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameScheduler {
    resume_at: Option<Duration>,
}

impl FrameScheduler {
    pub fn suspend(&mut self, now: Duration, backoff: Duration) {
        self.resume_at = Some(now + backoff);
    }

    pub fn is_suspended(&self, now: Duration) -> bool {
        self.resume_at.is_some_and(|resume_at| now < resume_at)
    }

    /// Whether a frame may run at `now`; forgets an expired suspension.
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.is_suspended(now) {
            return false;
        }
        self.resume_at = None;
        true
    }
}

/// Targets whatever the crosshair is on and draws its telemetry panel.
#[derive(Debug)]
pub struct EntityDebugger {
    enabled: bool,
    target: TargetState,
    models: ModelRegistry,
    scheduler: FrameScheduler,
    backoff: Duration,
}

impl EntityDebugger {
    /// Starts disabled with no target.
    pub fn new(models: ModelRegistry) -> Self {
        Self {
            enabled: false,
            target: TargetState::new(),
            models,
            scheduler: FrameScheduler::default(),
            backoff: ERROR_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn target(&self) -> &TargetState {
        &self.target
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// Run one frame. `now` is the host's frame clock.
    ///
    /// Never fails: a faulting frame is logged and the driver sits out
    /// frames until the back-off has elapsed.
    pub fn on_tick<H: DebugHost + ?Sized>(&mut self, host: &mut H, now: Duration) -> FrameOutcome {
        if !self.scheduler.poll(now) {
            return FrameOutcome::Suspended;
        }
        match self.run_frame(host) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("Entity debugger frame failed: {}", err);
                self.scheduler.suspend(now, self.backoff);
                FrameOutcome::Faulted
            }
        }
    }

    fn run_frame<H: DebugHost + ?Sized>(&mut self, host: &mut H) -> HostResult<FrameOutcome> {
        if host.toggle_just_pressed() {
            self.toggle(host);
        }
        if !self.enabled {
            return Ok(FrameOutcome::Disabled);
        }

        let aim_held = host.aim_held();
        self.target.acquire(&*host, aim_held)?;
        host.draw_crosshair(self.target.crosshair_color());
        self.target.engage_lock(aim_held);

        let had_target = self.target.hovered().is_some();
        let Some(entity) = self.target.validate(&*host)? else {
            return Ok(if had_target {
                FrameOutcome::TargetLost
            } else {
                FrameOutcome::NoTarget
            });
        };

        let rows = self.draw_panel(host, entity)?;
        Ok(FrameOutcome::Rendered { rows })
    }

    fn toggle<H: DebugHost + ?Sized>(&mut self, host: &mut H) {
        self.enabled = !self.enabled;
        let message = format!(
            "Entity Debugger is now {}.",
            if self.enabled { "Enabled" } else { "Disabled" }
        );
        log::info!("{}", message);
        host.notify(&message);
    }

    fn draw_panel<H: DebugHost + ?Sized>(&self, host: &mut H, entity: Entity) -> HostResult<usize> {
        let position = host.position(entity)?;
        let projected = host.world_to_screen(position);
        let viewer_position = host.position(host.viewer()?)?;
        let distance = viewer_position.distance_squared(position).sqrt();

        let snapshot = build_snapshot(&*host, &self.models, entity);
        let layout = layout_panel(projected, distance, &snapshot);

        host.draw_rect(layout.panel.center(), layout.panel.size(), PANEL_COLOR);
        for line in &layout.lines {
            host.draw_text(&line.text, line.position);
        }
        Ok(snapshot.len())
    }
}
