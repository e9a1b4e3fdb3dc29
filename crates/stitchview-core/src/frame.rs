use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;

/// Semantic category of a stitch; decides its render color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    #[default]
    Normal,
    Increase,
    Decrease,
}

/// One stitch of a round, as delivered by the frame provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    /// Unique within its frame only. The same id may reappear in later rounds.
    pub id: String,
    pub stitch_type: String,
    pub position: [f64; 2],
    #[serde(default)]
    pub highlight: Highlight,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_3d: Option<[f64; 3]>,
    /// Painter's-algorithm key: lower values are drawn first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_order: Option<i64>,
    /// In [0, 1]; scales apparent size and opacity in 3D mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_factor: Option<f64>,
}

impl RenderNode {
    pub fn new(id: &str, stitch_type: &str, x: f64, y: f64) -> Self {
        Self {
            id: id.to_string(),
            stitch_type: stitch_type.to_string(),
            position: [x, y],
            highlight: Highlight::Normal,
            position_3d: None,
            depth_order: None,
            depth_factor: None,
        }
    }

    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn with_depth(mut self, position_3d: [f64; 3], depth_order: i64, depth_factor: f64) -> Self {
        self.position_3d = Some(position_3d);
        self.depth_order = Some(depth_order);
        self.depth_factor = Some(depth_factor);
        self
    }

    pub fn position(&self) -> Point {
        Point::from(self.position)
    }
}

/// An adjacency between two stitches, by id. Either end may dangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderEdge {
    pub source: String,
    pub target: String,
}

impl RenderEdge {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    Isometric,
    Dimetric,
    Perspective,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3d {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

/// Present only on 3D-capable datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionMetadata {
    #[serde(rename = "type")]
    pub kind: ProjectionKind,
    pub angle_deg: f64,
    pub bounds_3d: Bounds3d,
}

/// The renderable snapshot of one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationFrame {
    /// 1-indexed; matches the frame's position in the sequence.
    pub round_number: u32,
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub stitch_count: u32,
    /// Ids of nodes in `nodes` that are increases or decreases.
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<ProjectionMetadata>,
}

impl VisualizationFrame {
    pub fn new(round_number: u32, nodes: Vec<RenderNode>, edges: Vec<RenderEdge>) -> Self {
        let highlights = nodes
            .iter()
            .filter(|n| n.highlight != Highlight::Normal)
            .map(|n| n.id.clone())
            .collect();
        Self {
            round_number,
            stitch_count: nodes.len() as u32,
            nodes,
            edges,
            highlights,
            projection: None,
        }
    }

    pub fn with_projection(mut self, projection: ProjectionMetadata) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn increase_count(&self) -> usize {
        self.count_highlight(Highlight::Increase)
    }

    pub fn decrease_count(&self) -> usize {
        self.count_highlight(Highlight::Decrease)
    }

    fn count_highlight(&self, highlight: Highlight) -> usize {
        self.nodes.iter().filter(|n| n.highlight == highlight).count()
    }
}

/// Whether a frame set renders in 3D.
///
/// This is decided once for the whole session by looking only at the first
/// node of the first frame; later frames and nodes are never consulted.
pub fn frames_are_3d(frames: &[VisualizationFrame]) -> bool {
    frames
        .first()
        .and_then(|f| f.nodes.first())
        .is_some_and(|n| n.position_3d.is_some())
}

/// Identity of one frame set, stamped by the store on every `set_frames`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSetId(pub Uuid);

impl FrameSetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FrameSetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FrameSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Payload returned by the frame provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationResponse {
    pub frames: Vec<VisualizationFrame>,
    pub total_rounds: u32,
    pub shape_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_serializes_lowercase() {
        let node = RenderNode::new("r1s0", "inc", 1.0, 2.0).with_highlight(Highlight::Increase);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["highlight"], "increase");
        assert!(json.get("position_3d").is_none());
    }

    #[test]
    fn test_frame_new_collects_highlights() {
        let frame = VisualizationFrame::new(
            2,
            vec![
                RenderNode::new("a", "sc", 0.0, 0.0),
                RenderNode::new("b", "inc", 1.0, 0.0).with_highlight(Highlight::Increase),
                RenderNode::new("c", "dec", 2.0, 0.0).with_highlight(Highlight::Decrease),
            ],
            vec![RenderEdge::new("a", "b")],
        );
        assert_eq!(frame.stitch_count, 3);
        assert_eq!(frame.highlights, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(frame.increase_count(), 1);
        assert_eq!(frame.decrease_count(), 1);
        assert!(frame.node("c").is_some());
        assert!(frame.node("z").is_none());
    }

    #[test]
    fn test_3d_mode_only_checks_first_node_of_first_frame() {
        let flat = VisualizationFrame::new(1, vec![RenderNode::new("a", "sc", 0.0, 0.0)], vec![]);
        let deep = VisualizationFrame::new(
            2,
            vec![RenderNode::new("b", "sc", 0.0, 0.0).with_depth([1.0, 1.0, 1.0], 0, 0.5)],
            vec![],
        );
        assert!(!frames_are_3d(&[flat.clone(), deep.clone()]));
        assert!(frames_are_3d(&[deep, flat]));
        assert!(!frames_are_3d(&[]));
    }

    #[test]
    fn test_projection_metadata_type_field() {
        let json = serde_json::json!({
            "type": "isometric",
            "angle_deg": 30.0,
            "bounds_3d": {
                "x_min": -1.0, "x_max": 1.0,
                "y_min": -1.0, "y_max": 1.0,
                "z_min": 0.0, "z_max": 2.0
            }
        });
        let meta: ProjectionMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(meta.kind, ProjectionKind::Isometric);
        assert!((meta.bounds_3d.z_max - 2.0).abs() < 1e-10);
    }
}
