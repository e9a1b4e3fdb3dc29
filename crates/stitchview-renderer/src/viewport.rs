use serde::{Deserialize, Serialize};
use stitchview_core::{BBox, Point};

use crate::render_data::Rgba;

/// Extra content-space margin kept around the viewport so stitches straddling
/// the edge are not culled.
pub const CULL_PADDING: f64 = 50.0;

/// Size of the drawing surface and the scale content is drawn at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSpec {
    /// Surface width in pixels.
    pub width: f64,
    /// Surface height in pixels.
    pub height: f64,
    /// Pixels per content unit.
    pub scale: f64,
}

impl ViewportSpec {
    pub fn new(width: f64, height: f64, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
        }
    }

    pub fn visible_bounds(&self) -> BBox {
        visible_bounds(self.width, self.height, self.scale)
    }

    pub fn lod_level(&self) -> LodLevel {
        lod_level(self.scale)
    }

    /// Map a surface pixel to content coordinates. Content origin sits at the
    /// surface center shifted by `pan` pixels.
    pub fn screen_to_content(&self, screen: Point, pan: Point) -> Point {
        let scale = effective_scale(self.scale);
        Point::new(
            (screen.x - self.width / 2.0 - pan.x) / scale,
            (screen.y - self.height / 2.0 - pan.y) / scale,
        )
    }

    pub fn content_to_screen(&self, content: Point, pan: Point) -> Point {
        let scale = effective_scale(self.scale);
        Point::new(
            content.x * scale + self.width / 2.0 + pan.x,
            content.y * scale + self.height / 2.0 + pan.y,
        )
    }

    /// Bit-exact key form, for hashing.
    pub(crate) fn key(&self) -> [u64; 3] {
        [self.width.to_bits(), self.height.to_bits(), self.scale.to_bits()]
    }
}

fn effective_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// The content-space rectangle that can appear on screen.
///
/// Always centered on the content origin; pan is deliberately not applied,
/// so heavily panned content can be culled while still on screen.
pub fn visible_bounds(viewport_width: f64, viewport_height: f64, scale: f64) -> BBox {
    let scale = effective_scale(scale);
    BBox::centered(viewport_width / scale, viewport_height / scale).expand(CULL_PADDING)
}

pub fn is_visible(position: &Point, bounds: &BBox) -> bool {
    bounds.contains_point(position)
}

/// Render-fidelity tier for the current scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LodLevel {
    Minimal,
    Reduced,
    Full,
}

pub fn lod_level(scale: f64) -> LodLevel {
    if scale >= 1.0 {
        LodLevel::Full
    } else if scale >= 0.5 {
        LodLevel::Reduced
    } else {
        LodLevel::Minimal
    }
}

/// Per-tier drawing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LodParams {
    pub node_radius: f64,
    pub node_stroke: Option<Rgba>,
    pub stroke_width: f64,
    pub edge_width: f64,
    pub labels: bool,
}

pub fn lod_params(level: LodLevel) -> LodParams {
    match level {
        LodLevel::Minimal => LodParams {
            node_radius: 4.0,
            node_stroke: None,
            stroke_width: 0.0,
            edge_width: 0.5,
            labels: false,
        },
        LodLevel::Reduced => LodParams {
            node_radius: 6.0,
            node_stroke: Some(Rgba::WHITE),
            stroke_width: 1.0,
            edge_width: 1.0,
            labels: false,
        },
        LodLevel::Full => LodParams {
            node_radius: 8.0,
            node_stroke: Some(Rgba::WHITE),
            stroke_width: 2.0,
            edge_width: 1.5,
            labels: true,
        },
    }
}
