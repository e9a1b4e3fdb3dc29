use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::frame::{FrameSetId, VisualizationFrame, VisualizationResponse};
use crate::geometry::Point;
use crate::provider::{FrameProvider, ProviderError, RequestTicket};

pub const DEFAULT_ZOOM: f64 = 1.0;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
}

/// The full visualization state tree. Everything a renderer needs can be
/// recomputed from this value alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualizationState {
    pub frames: Vec<VisualizationFrame>,
    /// `None` until the first frame set arrives.
    pub frame_set_id: Option<FrameSetId>,
    pub total_rounds: u32,
    pub shape_type: Option<String>,
    /// 1-indexed.
    pub current_round: u32,
    pub loading: bool,
    pub error: Option<String>,
    pub zoom_level: f64,
    pub is_panning: bool,
    pub pan_offset: Point,

    // Display preferences
    pub highlight_changes: bool,
    pub show_stitch_count: bool,
    pub show_round_numbers: bool,
    pub animation_speed: AnimationSpeed,
    pub view_mode: ViewMode,
}

impl Default for VisualizationState {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            frame_set_id: None,
            total_rounds: 0,
            shape_type: None,
            current_round: 1,
            loading: false,
            error: None,
            zoom_level: DEFAULT_ZOOM,
            is_panning: false,
            pan_offset: Point::ORIGIN,
            highlight_changes: true,
            show_stitch_count: true,
            show_round_numbers: true,
            animation_speed: AnimationSpeed::Medium,
            view_mode: ViewMode::TwoD,
        }
    }
}

/// A single state transition. Applying any action is infallible: invalid
/// input is clamped or ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    SetFrames {
        frames: Vec<VisualizationFrame>,
        shape_type: Option<String>,
    },
    SetCurrentRound(i64),
    NextRound,
    PrevRound,
    JumpToRound(i64),
    SetZoomLevel(f64),
    ZoomIn,
    ZoomOut,
    ResetZoom,
    SetPanning(bool),
    SetPanOffset(Point),
    ResetPan,
    SetHighlightChanges(bool),
    SetShowStitchCount(bool),
    SetShowRoundNumbers(bool),
    SetAnimationSpeed(AnimationSpeed),
    SetViewMode(ViewMode),
    SetLoading(bool),
    SetError(Option<String>),
    ResetVisualization,
}

/// Owner of the visualization state; the single writer for every transition.
#[derive(Debug, Default)]
pub struct VisualizationStore {
    state: VisualizationState,
    /// Sequence number of the latest fetch; older tickets are stale.
    request_seq: u64,
}

impl VisualizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &VisualizationState {
        &self.state
    }

    pub fn dispatch(&mut self, action: StoreAction) {
        let s = &mut self.state;
        match action {
            StoreAction::SetFrames { frames, shape_type } => {
                let id = FrameSetId::new();
                log::info!(
                    "New frame set {}: {} rounds ({})",
                    id,
                    frames.len(),
                    shape_type.as_deref().unwrap_or("unknown shape")
                );
                for (i, frame) in frames.iter().enumerate() {
                    if frame.round_number as usize != i + 1 {
                        log::warn!(
                            "Frame at index {} reports round {}; rounds are addressed by position",
                            i,
                            frame.round_number
                        );
                    }
                }
                s.total_rounds = frames.len() as u32;
                s.frames = frames;
                s.frame_set_id = Some(id);
                s.shape_type = shape_type;
                s.current_round = 1;
                s.error = None;
            }
            StoreAction::SetCurrentRound(n) => {
                if (1..=i64::from(s.total_rounds)).contains(&n) {
                    s.current_round = n as u32;
                }
            }
            StoreAction::NextRound => {
                if s.current_round < s.total_rounds {
                    s.current_round += 1;
                }
            }
            StoreAction::PrevRound => {
                if s.current_round > 1 {
                    s.current_round -= 1;
                }
            }
            StoreAction::JumpToRound(n) => {
                let max = i64::from(s.total_rounds.max(1));
                s.current_round = n.clamp(1, max) as u32;
            }
            StoreAction::SetZoomLevel(z) => {
                if z.is_finite() {
                    s.zoom_level = z.clamp(MIN_ZOOM, MAX_ZOOM);
                }
            }
            StoreAction::ZoomIn => s.zoom_level = (s.zoom_level + ZOOM_STEP).min(MAX_ZOOM),
            StoreAction::ZoomOut => s.zoom_level = (s.zoom_level - ZOOM_STEP).max(MIN_ZOOM),
            StoreAction::ResetZoom => s.zoom_level = DEFAULT_ZOOM,
            StoreAction::SetPanning(panning) => s.is_panning = panning,
            StoreAction::SetPanOffset(offset) => s.pan_offset = offset,
            StoreAction::ResetPan => s.pan_offset = Point::ORIGIN,
            StoreAction::SetHighlightChanges(v) => s.highlight_changes = v,
            StoreAction::SetShowStitchCount(v) => s.show_stitch_count = v,
            StoreAction::SetShowRoundNumbers(v) => s.show_round_numbers = v,
            StoreAction::SetAnimationSpeed(speed) => s.animation_speed = speed,
            StoreAction::SetViewMode(mode) => s.view_mode = mode,
            StoreAction::SetLoading(loading) => s.loading = loading,
            StoreAction::SetError(error) => s.error = error,
            StoreAction::ResetVisualization => {
                *s = VisualizationState::default();
                // Whatever is still in flight belongs to the discarded session.
                self.request_seq += 1;
            }
        }
    }

    // ── Frames ───────────────────────────────────────────────────────

    pub fn set_frames(&mut self, frames: Vec<VisualizationFrame>, shape_type: Option<String>) {
        self.dispatch(StoreAction::SetFrames { frames, shape_type });
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.dispatch(StoreAction::SetLoading(loading));
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.dispatch(StoreAction::SetError(error));
    }

    pub fn reset_visualization(&mut self) {
        self.dispatch(StoreAction::ResetVisualization);
    }

    // ── Round navigation ─────────────────────────────────────────────

    pub fn set_current_round(&mut self, round: i64) {
        self.dispatch(StoreAction::SetCurrentRound(round));
    }

    pub fn next_round(&mut self) {
        self.dispatch(StoreAction::NextRound);
    }

    pub fn prev_round(&mut self) {
        self.dispatch(StoreAction::PrevRound);
    }

    pub fn jump_to_round(&mut self, round: i64) {
        self.dispatch(StoreAction::JumpToRound(round));
    }

    // ── Zoom / pan ───────────────────────────────────────────────────

    pub fn set_zoom_level(&mut self, zoom: f64) {
        self.dispatch(StoreAction::SetZoomLevel(zoom));
    }

    pub fn zoom_in(&mut self) {
        self.dispatch(StoreAction::ZoomIn);
    }

    pub fn zoom_out(&mut self) {
        self.dispatch(StoreAction::ZoomOut);
    }

    pub fn reset_zoom(&mut self) {
        self.dispatch(StoreAction::ResetZoom);
    }

    pub fn set_panning(&mut self, panning: bool) {
        self.dispatch(StoreAction::SetPanning(panning));
    }

    pub fn set_pan_offset(&mut self, offset: Point) {
        self.dispatch(StoreAction::SetPanOffset(offset));
    }

    pub fn reset_pan(&mut self) {
        self.dispatch(StoreAction::ResetPan);
    }

    // ── Display preferences ──────────────────────────────────────────

    pub fn set_highlight_changes(&mut self, enabled: bool) {
        self.dispatch(StoreAction::SetHighlightChanges(enabled));
    }

    pub fn set_show_stitch_count(&mut self, enabled: bool) {
        self.dispatch(StoreAction::SetShowStitchCount(enabled));
    }

    pub fn set_show_round_numbers(&mut self, enabled: bool) {
        self.dispatch(StoreAction::SetShowRoundNumbers(enabled));
    }

    pub fn set_animation_speed(&mut self, speed: AnimationSpeed) {
        self.dispatch(StoreAction::SetAnimationSpeed(speed));
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.dispatch(StoreAction::SetViewMode(mode));
    }

    // ── Derived queries ──────────────────────────────────────────────

    pub fn current_frame(&self) -> Option<&VisualizationFrame> {
        let index = (self.state.current_round as usize).checked_sub(1)?;
        self.state.frames.get(index)
    }

    /// Stitch count of the current round, 0 when there is no such frame.
    pub fn current_stitch_count(&self) -> u32 {
        self.current_frame().map_or(0, |f| f.stitch_count)
    }

    pub fn is_first_round(&self) -> bool {
        self.state.current_round <= 1
    }

    pub fn is_last_round(&self) -> bool {
        self.state.current_round >= self.state.total_rounds
    }

    pub fn is_3d(&self) -> bool {
        crate::frame::frames_are_3d(&self.state.frames)
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Mark a fetch as started. Any earlier ticket becomes stale.
    pub fn begin_request(&mut self) -> RequestTicket {
        self.request_seq += 1;
        self.set_loading(true);
        self.set_error(None);
        RequestTicket(self.request_seq)
    }

    /// Apply the outcome of a fetch. Returns `false` when the ticket was
    /// superseded and the result was dropped.
    ///
    /// On failure the previous frames and round stay in place.
    pub fn finish_request(
        &mut self,
        ticket: RequestTicket,
        result: Result<VisualizationResponse, ProviderError>,
    ) -> bool {
        if ticket.0 != self.request_seq {
            log::debug!("Dropping superseded fetch result (ticket {})", ticket.0);
            return false;
        }
        match result {
            Ok(response) => {
                if response.total_rounds as usize != response.frames.len() {
                    log::warn!(
                        "Payload reports {} rounds but carries {} frames",
                        response.total_rounds,
                        response.frames.len()
                    );
                }
                self.set_frames(response.frames, Some(response.shape_type));
            }
            Err(e) => {
                log::info!("Visualization fetch failed: {}", e);
                self.set_error(Some(e.to_string()));
            }
        }
        self.set_loading(false);
        true
    }

    /// Fetch and apply frames for `pattern` in one step.
    pub fn load_from<P: FrameProvider + ?Sized>(&mut self, provider: &P, pattern: &Value) {
        let ticket = self.begin_request();
        let result = provider.visualize(pattern);
        self.finish_request(ticket, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RenderNode;

    fn frames(n: u32) -> Vec<VisualizationFrame> {
        (1..=n)
            .map(|round| {
                let nodes = (0..round * 6)
                    .map(|i| RenderNode::new(&format!("r{}s{}", round, i), "sc", i as f64, 0.0))
                    .collect();
                VisualizationFrame::new(round, nodes, vec![])
            })
            .collect()
    }

    fn store_with(n: u32) -> VisualizationStore {
        let mut store = VisualizationStore::new();
        store.set_frames(frames(n), Some("sphere".to_string()));
        store
    }

    #[test]
    fn test_set_frames_resets_round_and_error() {
        let mut store = store_with(4);
        store.jump_to_round(3);
        store.set_error(Some("boom".to_string()));
        let first_id = store.state().frame_set_id;

        store.set_frames(frames(2), None);
        let s = store.state();
        assert_eq!(s.total_rounds, 2);
        assert_eq!(s.current_round, 1);
        assert!(s.error.is_none());
        assert!(s.shape_type.is_none());
        assert_ne!(s.frame_set_id, first_id);
    }

    #[test]
    fn test_set_frames_accepts_empty() {
        let mut store = store_with(3);
        store.set_frames(Vec::new(), None);
        assert_eq!(store.state().total_rounds, 0);
        assert_eq!(store.state().current_round, 1);
        assert!(store.state().error.is_none());
        assert!(store.current_frame().is_none());
        assert_eq!(store.current_stitch_count(), 0);
    }

    #[test]
    fn test_set_current_round_ignores_out_of_range() {
        let mut store = store_with(5);
        store.set_current_round(3);
        for n in [-4, 0, 6, 100, i64::MAX, i64::MIN] {
            store.set_current_round(n);
            assert_eq!(store.state().current_round, 3);
        }
        store.set_current_round(5);
        assert_eq!(store.state().current_round, 5);
    }

    #[test]
    fn test_jump_to_round_clamps() {
        let mut store = store_with(5);
        for (n, expected) in [(-3, 1), (0, 1), (4, 4), (6, 5), (i64::MAX, 5)] {
            store.jump_to_round(n);
            assert_eq!(store.state().current_round, expected);
        }
    }

    #[test]
    fn test_jump_with_no_frames_stays_at_one() {
        let mut store = VisualizationStore::new();
        store.jump_to_round(9);
        assert_eq!(store.state().current_round, 1);
    }

    #[test]
    fn test_next_round_never_overshoots() {
        let mut store = store_with(7);
        for _ in 0..7 {
            store.next_round();
        }
        assert_eq!(store.state().current_round, 7);
        assert!(store.is_last_round());
    }

    #[test]
    fn test_prev_round_stops_at_first() {
        let mut store = store_with(3);
        store.next_round();
        store.prev_round();
        store.prev_round();
        assert_eq!(store.state().current_round, 1);
        assert!(store.is_first_round());
    }

    #[test]
    fn test_zoom_bounds() {
        let mut store = VisualizationStore::new();
        for _ in 0..20 {
            store.zoom_in();
            assert!(store.state().zoom_level <= MAX_ZOOM);
        }
        assert!((store.state().zoom_level - MAX_ZOOM).abs() < 1e-10);
        for _ in 0..20 {
            store.zoom_out();
            assert!(store.state().zoom_level >= MIN_ZOOM);
        }
        assert!((store.state().zoom_level - MIN_ZOOM).abs() < 1e-10);
        store.reset_zoom();
        assert_eq!(store.state().zoom_level, 1.0);
    }

    #[test]
    fn test_set_zoom_level_clamps_and_ignores_nan() {
        let mut store = VisualizationStore::new();
        store.set_zoom_level(10.0);
        assert_eq!(store.state().zoom_level, MAX_ZOOM);
        store.set_zoom_level(0.1);
        assert_eq!(store.state().zoom_level, MIN_ZOOM);
        store.set_zoom_level(f64::NAN);
        assert_eq!(store.state().zoom_level, MIN_ZOOM);
    }

    #[test]
    fn test_pan_is_unconstrained() {
        let mut store = VisualizationStore::new();
        store.set_panning(true);
        store.set_pan_offset(Point::new(-5000.0, 1e6));
        assert!(store.state().is_panning);
        assert_eq!(store.state().pan_offset, Point::new(-5000.0, 1e6));
        store.reset_pan();
        assert_eq!(store.state().pan_offset, Point::ORIGIN);
    }

    #[test]
    fn test_two_frame_scenario() {
        let mut store = VisualizationStore::new();
        store.set_frames(frames(2), None);
        assert_eq!(store.state().total_rounds, 2);
        assert_eq!(store.state().current_round, 1);
        assert!(store.state().error.is_none());

        store.jump_to_round(5);
        assert_eq!(store.state().current_round, 2);

        store.reset_visualization();
        assert_eq!(store.state().current_round, 1);
        assert_eq!(store.state().zoom_level, 1.0);
        assert_eq!(store.state().pan_offset, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_reset_restores_every_default() {
        let mut store = store_with(3);
        store.next_round();
        store.zoom_in();
        store.set_panning(true);
        store.set_pan_offset(Point::new(3.0, 4.0));
        store.set_loading(true);
        store.set_error(Some("x".to_string()));
        store.set_highlight_changes(false);
        store.set_show_stitch_count(false);
        store.set_show_round_numbers(false);
        store.set_animation_speed(AnimationSpeed::Fast);
        store.set_view_mode(ViewMode::ThreeD);

        store.reset_visualization();
        assert_eq!(store.state(), &VisualizationState::default());
        assert!(store.state().shape_type.is_none());
        assert!(store.state().frames.is_empty());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_frames() {
        let mut store = store_with(3);
        store.jump_to_round(2);
        let failing = |_: &Value| -> Result<VisualizationResponse, ProviderError> {
            Err(ProviderError::Unavailable("connection refused".to_string()))
        };
        store.load_from(&failing, &serde_json::json!({"shape": "sphere"}));

        let s = store.state();
        assert_eq!(s.total_rounds, 3);
        assert_eq!(s.current_round, 2);
        assert!(!s.loading);
        assert_eq!(
            s.error.as_deref(),
            Some("frame provider unavailable: connection refused")
        );
    }

    #[test]
    fn test_successful_fetch_sets_frames() {
        let mut store = VisualizationStore::new();
        let provider = |_: &Value| -> Result<VisualizationResponse, ProviderError> {
            Ok(VisualizationResponse {
                frames: frames(4),
                total_rounds: 4,
                shape_type: "cylinder".to_string(),
            })
        };
        store.load_from(&provider, &Value::Null);
        assert_eq!(store.state().total_rounds, 4);
        assert_eq!(store.state().shape_type.as_deref(), Some("cylinder"));
        assert!(!store.state().loading);
    }

    #[test]
    fn test_superseded_request_is_ignored() {
        let mut store = VisualizationStore::new();
        let stale = store.begin_request();
        let fresh = store.begin_request();
        assert!(store.state().loading);

        let applied = store.finish_request(
            stale,
            Ok(VisualizationResponse {
                frames: frames(9),
                total_rounds: 9,
                shape_type: "sphere".to_string(),
            }),
        );
        assert!(!applied);
        assert_eq!(store.state().total_rounds, 0);
        assert!(store.state().loading);

        assert!(store.finish_request(fresh, Err(ProviderError::Rejected("bad".to_string()))));
        assert!(!store.state().loading);
        assert_eq!(store.state().error.as_deref(), Some("pattern rejected: bad"));
    }

    #[test]
    fn test_dispatch_matches_methods() {
        let mut a = store_with(4);
        let mut b = store_with(4);
        a.next_round();
        a.zoom_in();
        b.dispatch(StoreAction::NextRound);
        b.dispatch(StoreAction::ZoomIn);
        assert_eq!(a.state().current_round, b.state().current_round);
        assert_eq!(a.state().zoom_level, b.state().zoom_level);
    }

    #[test]
    fn test_current_stitch_count() {
        let mut store = store_with(3);
        assert_eq!(store.current_stitch_count(), 6);
        store.next_round();
        assert_eq!(store.current_stitch_count(), 12);
    }
}
