//! # Stitchview Core
//!
//! Frame data model for round-by-round crochet diagrams, the isometric
//! projection used for 3D-capable datasets, and the visualization state store
//! that owns round, zoom and pan navigation.
//!
//! Every store transition is infallible. Out-of-range input is clamped or
//! ignored, never reported as an error.

pub mod geometry;
pub mod frame;
pub mod projection;
pub mod provider;
pub mod spatial;
pub mod store;

pub use frame::{
    FrameSetId, Highlight, RenderEdge, RenderNode, VisualizationFrame, VisualizationResponse,
};
pub use geometry::{BBox, Point};
pub use projection::{project, Projector, DEFAULT_ANGLE_DEG};
pub use provider::{FrameProvider, ProviderError, RequestTicket};
pub use store::{AnimationSpeed, StoreAction, ViewMode, VisualizationState, VisualizationStore};
