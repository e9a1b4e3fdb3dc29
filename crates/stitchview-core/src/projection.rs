use crate::frame::{RenderNode, VisualizationFrame};
use crate::geometry::Point;

/// Isometric angle used when a dataset carries no projection metadata.
pub const DEFAULT_ANGLE_DEG: f64 = 30.0;

/// Project a 3D stitch coordinate onto the 2D diagram plane.
///
/// `screen_x = (x - y) * cos(a)`, `screen_y = (x + y) * sin(a) - z`.
pub fn project(x: f64, y: f64, z: f64, angle_deg: f64) -> Point {
    let a = angle_deg.to_radians();
    Point::new((x - y) * a.cos(), (x + y) * a.sin() - z)
}

/// Screen-space placement for a frame set.
///
/// Built once per composite: 3D mode and the projection angle are properties
/// of the whole session, never of a single frame or node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub three_d: bool,
    pub angle_deg: f64,
}

impl Projector {
    pub fn flat() -> Self {
        Self {
            three_d: false,
            angle_deg: DEFAULT_ANGLE_DEG,
        }
    }

    pub fn for_frames(frames: &[VisualizationFrame]) -> Self {
        let angle_deg = frames
            .first()
            .and_then(|f| f.projection.as_ref())
            .map(|p| p.angle_deg)
            .filter(|a| a.is_finite())
            .unwrap_or(DEFAULT_ANGLE_DEG);
        Self {
            three_d: crate::frame::frames_are_3d(frames),
            angle_deg,
        }
    }

    /// Where `node` lands on screen. A node without 3D data keeps its 2D
    /// position even inside a 3D session.
    pub fn screen_position(&self, node: &RenderNode) -> Point {
        match (self.three_d, node.position_3d) {
            (true, Some([x, y, z])) => project(x, y, z, self.angle_deg),
            _ => node.position(),
        }
    }
}
