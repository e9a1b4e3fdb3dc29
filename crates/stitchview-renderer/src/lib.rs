//! # Stitchview Renderer
//!
//! Turns a frame set and the current round into an ordered draw list:
//! cumulative round compositing, viewport culling, and level-of-detail.
//!
//! The output is plain serializable data (coordinates, radii, colors, ids) so
//! any host surface can paint it without further domain logic.

pub mod viewport;
pub mod render_data;
pub mod compositor;
pub mod cache;

pub use cache::{CacheKey, DrawListCache};
pub use compositor::{composite, composite_state};
pub use render_data::{DrawItem, DrawList, EdgeItem, NodeItem, Rgba};
pub use viewport::{is_visible, lod_level, lod_params, visible_bounds, LodLevel, LodParams, ViewportSpec};
