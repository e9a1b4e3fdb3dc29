use serde::{Deserialize, Serialize};
use stitchview_core::spatial::{SpatialEntry, SpatialIndex};
use stitchview_core::{BBox, Highlight, Point};

use crate::viewport::LodLevel;

/// An sRGB color with straight alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(0xFF, 0xFF, 0xFF);
    pub const INCREASE: Rgba = Rgba::rgb(0x10, 0xB9, 0x81);
    pub const DECREASE: Rgba = Rgba::rgb(0xEF, 0x44, 0x44);
    pub const NORMAL: Rgba = Rgba::rgb(0x6B, 0x72, 0x80);
    pub const EDGE: Rgba = Rgba::rgb(0xD1, 0xD5, 0xDB);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same hue, alpha multiplied by `factor`.
    pub fn with_alpha(self, factor: f64) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn for_highlight(highlight: Highlight) -> Self {
        match highlight {
            Highlight::Increase => Self::INCREASE,
            Highlight::Decrease => Self::DECREASE,
            Highlight::Normal => Self::NORMAL,
        }
    }
}

/// A line between two stitches, drawn behind every node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeItem {
    pub source: String,
    pub target: String,
    pub from: Point,
    pub to: Point,
    pub stroke: Rgba,
    pub width: f64,
}

/// One stitch circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeItem {
    pub id: String,
    /// Round the node was enumerated from (1-indexed).
    pub round: u32,
    pub is_current: bool,
    pub center: Point,
    pub radius: f64,
    pub fill: Rgba,
    pub stroke: Option<Rgba>,
    pub stroke_width: f64,
    /// Stitch type text, present only when the LOD tier shows labels.
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DrawItem {
    Edge(EdgeItem),
    Node(NodeItem),
}

/// Ordered paint list for one composite: edges first, then nodes back to
/// front. Coordinates are in unscaled content space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    pub items: Vec<DrawItem>,
    pub lod: LodLevel,
    /// Culling rectangle the list was built against.
    pub bounds: BBox,
    pub three_d: bool,
}

impl DrawList {
    pub fn empty(lod: LodLevel, bounds: BBox) -> Self {
        Self {
            items: Vec::new(),
            lod,
            bounds,
            three_d: false,
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeItem> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Edge(e) => Some(e),
            DrawItem::Node(_) => None,
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeItem> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Node(n) => Some(n),
            DrawItem::Edge(_) => None,
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// R-tree over node circles, keyed by position in `items`.
    pub fn hit_index(&self) -> SpatialIndex {
        let entries = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(item_index, item)| match item {
                DrawItem::Node(n) => Some(SpatialEntry {
                    item_index,
                    center: n.center,
                    radius: n.radius,
                }),
                DrawItem::Edge(_) => None,
            })
            .collect();
        SpatialIndex::build(entries)
    }

    /// Id of the top-most stitch under `point` (content coordinates).
    pub fn pick(&self, point: Point) -> Option<&str> {
        let index = self.hit_index();
        let hit = index.topmost_at(&point)?;
        match &self.items[hit.item_index] {
            DrawItem::Node(n) => Some(n.id.as_str()),
            DrawItem::Edge(_) => None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
