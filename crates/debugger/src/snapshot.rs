//! Per-frame telemetry for the inspected entity.

use crate::error::HostResult;
use crate::format::{self, grouped_f32, HEALTH_DECIMALS, SCALAR_DECIMALS};
use crate::host::{EntityReader, SceneQuery, VehicleVitals};
use crate::models::ModelRegistry;
use engine_core::Entity;
use std::fmt;

/// Vehicle speed is divided by this before display.
pub const SPEED_DIVISOR: f32 = 0.621371;

/// One panel line. A blank label with a blank value is a spacer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryRow {
    pub label: String,
    pub value: String,
}

impl TelemetryRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn spacer() -> Self {
        Self::new("", "")
    }

    pub fn is_spacer(&self) -> bool {
        self.label.is_empty() && self.value.is_empty()
    }

    /// Rows without a value take up a line but draw nothing.
    pub fn is_drawn(&self) -> bool {
        !self.value.is_empty()
    }
}

impl fmt::Display for TelemetryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// Ordered telemetry rows; order is render order and labels may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    rows: Vec<TelemetryRow>,
}

impl TelemetrySnapshot {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[TelemetryRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TelemetryRow> {
        self.rows.iter()
    }

    /// Value of the first row with `label`.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }

    fn push(&mut self, label: &str, value: impl Into<String>) {
        self.rows.push(TelemetryRow::new(label, value));
    }

    fn push_spacer(&mut self) {
        self.rows.push(TelemetryRow::spacer());
    }
}

impl<'a> IntoIterator for &'a TelemetrySnapshot {
    type Item = &'a TelemetryRow;
    type IntoIter = std::slice::Iter<'a, TelemetryRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Read `entity`'s telemetry from the host.
///
/// Read failures are logged and whatever rows were built before the failure
/// are returned, so a despawn mid-frame yields a short (possibly empty) panel
/// instead of an error.
pub fn build_snapshot<H>(host: &H, models: &ModelRegistry, entity: Entity) -> TelemetrySnapshot
where
    H: SceneQuery + EntityReader + ?Sized,
{
    let mut snapshot = TelemetrySnapshot::default();
    if let Err(err) = fill_snapshot(&mut snapshot, host, models, entity) {
        log::error!("Failed to read telemetry for {:?}: {}", entity, err);
    }
    snapshot
}

fn fill_snapshot<H>(
    snapshot: &mut TelemetrySnapshot,
    host: &H,
    models: &ModelRegistry,
    entity: Entity,
) -> HostResult<()>
where
    H: SceneQuery + EntityReader + ?Sized,
{
    let position = host.position(entity)?;
    let rotation = host.rotation(entity)?;
    let velocity = host.velocity(entity)?;

    let model = host.model(entity)?;
    snapshot.push("Model Name", models.resolve(model));
    snapshot.push("Model Hash", model.signed().to_string());
    snapshot.push("Model Hash (Hex)", format!("0x{:X}", model.raw()));
    snapshot.push_spacer();

    match host.vehicle(entity)? {
        Some(vitals) => push_vehicle_rows(snapshot, &vitals),
        None => {
            let (current, max) = host.health(entity)?;
            snapshot.push("Health", format!("{:.0} / {:.0}", current, max));
        }
    }
    snapshot.push_spacer();

    let viewer = host.viewer()?;
    let viewer_position = host.position(viewer)?;
    let distance = viewer_position.distance_squared(position).sqrt();
    snapshot.push("Distance", format!("{} Meters", grouped_f32(distance, SCALAR_DECIMALS)));
    snapshot.push("Heading", grouped_f32(host.heading(entity)?, SCALAR_DECIMALS));
    snapshot.push("Position", format::vector(position));
    snapshot.push("Rotation", format::vector(rotation));
    snapshot.push("Velocity", format::vector(velocity));
    Ok(())
}

fn push_vehicle_rows(snapshot: &mut TelemetrySnapshot, vitals: &VehicleVitals) {
    snapshot.push(
        "Engine Health",
        format!("{} / 1,000.0", grouped_f32(vitals.engine_health, HEALTH_DECIMALS)),
    );
    snapshot.push(
        "Body Health",
        format!("{} / 1,000.0", grouped_f32(vitals.body_health, HEALTH_DECIMALS)),
    );
    snapshot.push(
        "Speed",
        format!("{} MP/H", grouped_f32(vitals.speed / SPEED_DIVISOR, SCALAR_DECIMALS)),
    );
    snapshot.push("RPM", grouped_f32(vitals.rpm, SCALAR_DECIMALS));
    snapshot.push("Current Gear", vitals.gear.to_string());
    snapshot.push("Acceleration", grouped_f32(vitals.acceleration, SCALAR_DECIMALS));
}
