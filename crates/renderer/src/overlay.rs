//! Screen-space overlay geometry (rects, text, crosshair).
//!
//! The builder only produces vertex and index lists; a host render pass
//! uploads them with its own pipeline and font atlas.

use bytemuck::{Pod, Zeroable};

/// Vertex for screen-space text / UI overlay.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct OverlayVertex {
    /// NDC position (x, y) in -1..1
    pub position: [f32; 2],
    /// UV into font atlas (negative x = solid color quad)
    pub tex_coords: [f32; 2],
    /// RGBA color
    pub color: [f32; 4],
}

/// Font atlas layout: 16 columns x 6 rows of 6x8 pixel glyphs, covering ASCII 32..127.
const FONT_COLS: f32 = 16.0;
const FONT_ROWS: f32 = 6.0;
pub const GLYPH_PX_W: f32 = 6.0;
pub const GLYPH_PX_H: f32 = 8.0;

/// Crosshair arm length and thickness in pixels.
const CROSSHAIR_ARM: f32 = 6.0;
const CROSSHAIR_THICKNESS: f32 = 2.0;

/// Helper to build screen-space overlay geometry.
/// Generates OverlayVertex quads for each character, rect and crosshair arm.
#[derive(Debug)]
pub struct OverlayTextBuilder {
    pub vertices: Vec<OverlayVertex>,
    pub indices: Vec<u32>,
    screen_w: f32,
    screen_h: f32,
}

impl OverlayTextBuilder {
    pub fn new(screen_w: f32, screen_h: f32) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            screen_w,
            screen_h,
        }
    }

    pub fn screen_size(&self) -> (f32, f32) {
        (self.screen_w, self.screen_h)
    }

    /// Drop all geometry, keeping allocations for the next frame.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Number of quads emitted so far.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Convert pixel coords to NDC.
    fn px_to_ndc(&self, px: f32, py: f32) -> [f32; 2] {
        [
            (px / self.screen_w) * 2.0 - 1.0,
            1.0 - (py / self.screen_h) * 2.0,
        ]
    }

    fn push_quad(&mut self, x: f32, y: f32, w: f32, h: f32, uv: [f32; 4], color: [f32; 4]) {
        let tl = self.px_to_ndc(x, y);
        let br = self.px_to_ndc(x + w, y + h);
        let [u0, v0, u1, v1] = uv;
        let base = self.vertices.len() as u32;
        self.vertices.push(OverlayVertex { position: [tl[0], tl[1]], tex_coords: [u0, v0], color });
        self.vertices.push(OverlayVertex { position: [br[0], tl[1]], tex_coords: [u1, v0], color });
        self.vertices.push(OverlayVertex { position: [br[0], br[1]], tex_coords: [u1, v1], color });
        self.vertices.push(OverlayVertex { position: [tl[0], br[1]], tex_coords: [u0, v1], color });
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Add a solid-color rectangle. Coordinates in pixels, (x, y) is the top-left corner.
    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        // sentinel: solid color
        self.push_quad(x, y, w, h, [-1.0, -1.0, -1.0, -1.0], color);
    }

    /// Add a string of text at pixel position (x, y) with the given scale and color.
    /// `scale` = 1.0 means each glyph is 6x8 screen pixels; 2.0 doubles that.
    pub fn add_text(&mut self, x: f32, y: f32, text: &str, scale: f32, color: [f32; 4]) {
        let gw = GLYPH_PX_W * scale;
        let gh = GLYPH_PX_H * scale;
        let mut cx = x;
        for ch in text.chars() {
            let code = ch as u32;
            // Spaces and glyphs outside the atlas only advance the pen.
            if code <= 32 || code > 127 {
                cx += gw;
                continue;
            }
            let idx = code - 32;
            let col = (idx % 16) as f32;
            let row = (idx / 16) as f32;
            let uv = [
                col / FONT_COLS,
                row / FONT_ROWS,
                (col + 1.0) / FONT_COLS,
                (row + 1.0) / FONT_ROWS,
            ];
            self.push_quad(cx, y, gw, gh, uv, color);
            cx += gw;
        }
    }

    /// Add a plus-shaped crosshair centred on (cx, cy) in pixels.
    pub fn add_crosshair(&mut self, cx: f32, cy: f32, color: [f32; 4]) {
        let half = CROSSHAIR_THICKNESS * 0.5;
        self.add_rect(cx - CROSSHAIR_ARM, cy - half, CROSSHAIR_ARM * 2.0, CROSSHAIR_THICKNESS, color);
        self.add_rect(cx - half, cy - CROSSHAIR_ARM, CROSSHAIR_THICKNESS, CROSSHAIR_ARM * 2.0, color);
    }
}
