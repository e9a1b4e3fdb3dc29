use std::collections::{HashMap, HashSet};

use stitchview_core::{Point, Projector, RenderNode, VisualizationFrame, VisualizationState};

use crate::render_data::{DrawItem, DrawList, EdgeItem, NodeItem, Rgba};
use crate::viewport::{is_visible, lod_params, ViewportSpec};

/// Alpha multiplier for stitches of rounds other than the current one.
pub const NON_CURRENT_OPACITY: f64 = 0.8;

const EDGE_ALPHA_2D: f64 = 0.6;
const EDGE_ALPHA_3D: f64 = 0.4;

/// A node as enumerated for drawing, before culling.
struct Placed<'a> {
    node: &'a RenderNode,
    frame_index: usize,
    is_current: bool,
    screen: Point,
}

/// Build the cumulative draw list for `current_round` (1-indexed).
///
/// Rounds 1 through `current_round` are drawn together, the current one at
/// full strength; later rounds are left out. A round past the last frame draws
/// every frame with none marked current. Edge endpoints are resolved through a
/// single id map built from all frames, in which later frames overwrite earlier
/// ones, so when ids repeat across rounds an edge follows the newest node
/// carrying that id.
pub fn composite(
    frames: &[VisualizationFrame],
    current_round: u32,
    viewport: &ViewportSpec,
) -> DrawList {
    let level = viewport.lod_level();
    let params = lod_params(level);
    let bounds = viewport.visible_bounds();
    let projector = Projector::for_frames(frames);
    let current_index = (current_round as usize).checked_sub(1);
    let drawn = &frames[..(current_round as usize).min(frames.len())];

    let mut lookup: HashMap<&str, (&RenderNode, usize)> = HashMap::new();
    for (frame_index, frame) in frames.iter().enumerate() {
        for node in &frame.nodes {
            lookup.insert(node.id.as_str(), (node, frame_index));
        }
    }

    let mut placed: Vec<Placed<'_>> = drawn
        .iter()
        .enumerate()
        .flat_map(|(frame_index, frame)| {
            frame.nodes.iter().map(move |node| Placed {
                node,
                frame_index,
                is_current: Some(frame_index) == current_index,
                screen: projector.screen_position(node),
            })
        })
        .collect();
    let enumerated = placed.len();

    if projector.three_d {
        // Stable: equal depths keep enumeration order.
        placed.sort_by_key(|p| p.node.depth_order.unwrap_or(0));
    }

    placed.retain(|p| is_visible(&p.screen, &bounds));
    let visible_ids: HashSet<&str> = placed.iter().map(|p| p.node.id.as_str()).collect();

    let edge_stroke = Rgba::EDGE.with_alpha(if projector.three_d {
        EDGE_ALPHA_3D
    } else {
        EDGE_ALPHA_2D
    });
    let mut items = Vec::new();
    let mut dropped_edges = 0usize;
    let mut cross_round_edges = 0usize;
    for (frame_index, frame) in drawn.iter().enumerate() {
        for edge in &frame.edges {
            if !visible_ids.contains(edge.source.as_str())
                || !visible_ids.contains(edge.target.as_str())
            {
                dropped_edges += 1;
                continue;
            }
            let (Some(&(source, source_frame)), Some(&(target, target_frame))) = (
                lookup.get(edge.source.as_str()),
                lookup.get(edge.target.as_str()),
            ) else {
                dropped_edges += 1;
                continue;
            };
            if source_frame != frame_index || target_frame != frame_index {
                cross_round_edges += 1;
            }
            items.push(DrawItem::Edge(EdgeItem {
                source: edge.source.clone(),
                target: edge.target.clone(),
                from: projector.screen_position(source),
                to: projector.screen_position(target),
                stroke: edge_stroke,
                width: params.edge_width,
            }));
        }
    }

    for p in &placed {
        let depth = if projector.three_d {
            p.node.depth_factor.map(|d| d.clamp(0.0, 1.0))
        } else {
            None
        };
        let (radius, mut opacity) = match depth {
            Some(d) => (params.node_radius * (0.6 + 0.4 * d), 0.7 + 0.3 * d),
            None => (params.node_radius, 1.0),
        };
        if !p.is_current {
            opacity *= NON_CURRENT_OPACITY;
        }
        items.push(DrawItem::Node(NodeItem {
            id: p.node.id.clone(),
            round: p.frame_index as u32 + 1,
            is_current: p.is_current,
            center: p.screen,
            radius,
            fill: Rgba::for_highlight(p.node.highlight).with_alpha(opacity),
            stroke: params.node_stroke,
            stroke_width: params.stroke_width,
            label: params.labels.then(|| p.node.stitch_type.clone()),
        }));
    }

    log::debug!(
        "Composited round {}: {}/{} nodes visible, {} edges drawn ({} dropped, {} resolved across rounds), lod {:?}",
        current_round,
        placed.len(),
        enumerated,
        items.len() - placed.len(),
        dropped_edges,
        cross_round_edges,
        level
    );

    DrawList {
        items,
        lod: level,
        bounds,
        three_d: projector.three_d,
    }
}

/// Composite straight from a store snapshot.
pub fn composite_state(state: &VisualizationState, viewport: &ViewportSpec) -> DrawList {
    composite(&state.frames, state.current_round, viewport)
}
