//! Screen projection and panel geometry, all in normalized screen units.

use crate::host::Color;
use crate::snapshot::TelemetrySnapshot;
use engine_core::Vec2;

/// Anchor used when the entity does not project strictly inside the screen.
pub const DEFAULT_ANCHOR: ScreenAnchor = ScreenAnchor { x: 0.6, y: 0.5 };
pub const PANEL_WIDTH: f32 = 0.24;
/// Vertical advance per row.
pub const ROW_HEIGHT: f32 = 0.024;
/// Panel height on top of the rows.
pub const PANEL_PADDING: f32 = 0.048;
/// Gap between the panel's left edge and the text.
pub const TEXT_INSET: f32 = 0.02;
/// Rightward nudge for a target at distance zero.
pub const MAX_NUDGE: f32 = 0.1;
/// Distance at which the nudge reaches zero.
pub const NUDGE_FALLOFF_DISTANCE: f32 = 100.0;
pub const PANEL_COLOR: Color = [0.0, 0.0, 0.0, 120.0 / 255.0];

/// A point on screen, (0, 0) top-left to (1, 1) bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenAnchor {
    pub x: f32,
    pub y: f32,
}

impl ScreenAnchor {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Strictly inside the unit square; the edges count as off-screen.
    pub fn is_on_screen(&self) -> bool {
        self.x > 0.0 && self.y > 0.0 && self.x < 1.0 && self.y < 1.0
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Anchor for a host projection result, falling back to [`DEFAULT_ANCHOR`].
pub fn project_anchor(projected: Option<Vec2>) -> ScreenAnchor {
    projected
        .map(|p| ScreenAnchor::new(p.x, p.y))
        .filter(ScreenAnchor::is_on_screen)
        .unwrap_or(DEFAULT_ANCHOR)
}

/// Rightward nudge for a target `distance` meters away: 0.1 up close, 0 from 100 m on.
pub fn distance_offset(distance: f32) -> f32 {
    ((1.0 - distance / NUDGE_FALLOFF_DISTANCE) * MAX_NUDGE).clamp(0.0, MAX_NUDGE)
}

/// Panel rectangle; `x, y` is its centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PanelGeometry {
    /// Panel whose left edge sits on `anchor`, vertically centred on it.
    pub fn new(anchor: ScreenAnchor, rows: usize) -> Self {
        Self {
            x: anchor.x + PANEL_WIDTH * 0.5,
            y: anchor.y,
            width: PANEL_WIDTH,
            height: Self::height_for_rows(rows),
        }
    }

    pub fn height_for_rows(rows: usize) -> f32 {
        rows as f32 * ROW_HEIGHT + PANEL_PADDING
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub position: Vec2,
}

/// Everything needed to draw one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    /// Anchor after the distance nudge.
    pub anchor: ScreenAnchor,
    pub panel: PanelGeometry,
    pub lines: Vec<TextLine>,
}

/// Lay out `snapshot` next to an entity projected at `projected`, `distance` meters away.
///
/// Rows start half the rows' height above the anchor and advance by
/// [`ROW_HEIGHT`]. Rows with an empty value emit no line but still advance.
pub fn layout_panel(projected: Option<Vec2>, distance: f32, snapshot: &TelemetrySnapshot) -> PanelLayout {
    let mut anchor = project_anchor(projected);
    anchor.x += distance_offset(distance);

    let rows = snapshot.len();
    let panel = PanelGeometry::new(anchor, rows);

    let mut cursor = Vec2::new(anchor.x + TEXT_INSET, anchor.y - rows as f32 * ROW_HEIGHT * 0.5);
    let mut lines = Vec::with_capacity(rows);
    for row in snapshot {
        if row.is_drawn() {
            lines.push(TextLine {
                text: row.to_string(),
                position: cursor,
            });
        }
        cursor.y += ROW_HEIGHT;
    }

    PanelLayout { anchor, panel, lines }
}
