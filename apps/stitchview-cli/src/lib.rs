use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;

use stitchview_core::{Point, VisualizationStore};
use stitchview_io::{FileFrameProvider, ViewerConfig};
use stitchview_nav::{round_label, NavInput, RecordingSink, RoundNavigator};
use stitchview_renderer::{DrawList, DrawListCache, ViewportSpec};

/// One viewing session: the store, its draw-list memo, and the viewer config.
pub struct Session {
    pub store: VisualizationStore,
    cache: DrawListCache,
    config: ViewerConfig,
}

impl Session {
    pub fn new(config: ViewerConfig) -> Self {
        let mut store = VisualizationStore::new();
        config.apply_to(&mut store);
        Self {
            store,
            cache: DrawListCache::new(),
            config,
        }
    }

    pub fn with_config_file(path: Option<&Path>) -> Result<Self, String> {
        let config = match path {
            Some(path) => ViewerConfig::load(path).map_err(|e| e.to_string())?,
            None => ViewerConfig::default(),
        };
        Ok(Self::new(config))
    }

    /// Override the configured surface size.
    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.config.viewport.width = width;
        self.config.viewport.height = height;
    }

    /// Viewport at an explicit scale. The scale is not clamped, so hosts can
    /// reach every LOD tier.
    pub fn viewport_at(&self, scale: f64) -> ViewportSpec {
        ViewportSpec::new(self.config.viewport.width, self.config.viewport.height, scale)
    }

    /// Load frames through the file-backed provider. A failed load leaves
    /// the message in the store and reports it here as well.
    pub fn open_payload(&mut self, path: &Path) -> Result<RoundsInfo, String> {
        let provider = FileFrameProvider::new(path);
        self.store.load_from(&provider, &Value::Null);
        if let Some(error) = &self.store.state().error {
            return Err(error.clone());
        }
        Ok(self.rounds_info())
    }

    pub fn rounds_info(&self) -> RoundsInfo {
        let s = self.store.state();
        RoundsInfo {
            shape_type: s.shape_type.clone(),
            total_rounds: s.total_rounds,
            current_round: s.current_round,
            three_d: self.store.is_3d(),
        }
    }

    /// Draw list for `round` at `scale`. The round is clamped by the store;
    /// the scale goes to the viewport as given.
    pub fn render(&mut self, round: i64, scale: f64) -> Arc<DrawList> {
        self.store.jump_to_round(round);
        let viewport = self.viewport_at(scale);
        self.cache.get_or_composite(self.store.state(), &viewport)
    }

    /// Id of the stitch under a surface pixel, using the store's pan offset.
    pub fn pick(&mut self, round: i64, scale: f64, screen: Point) -> Option<String> {
        let list = self.render(round, scale);
        let content = self
            .viewport_at(scale)
            .screen_to_content(screen, self.store.state().pan_offset);
        list.pick(content).map(str::to_string)
    }

    /// Step through every round, letting each announcement settle.
    pub fn walk_rounds(&mut self) -> Vec<RoundLine> {
        let delay = self.config.announce_delay();
        let mut nav = RoundNavigator::with_delay(RecordingSink::default(), delay);
        let mut now = Instant::now();

        nav.handle(&mut self.store, NavInput::JumpFirst, now);
        let mut lines = vec![RoundLine {
            label: round_label(&self.store),
            announcement: None,
        }];
        while !self.store.is_last_round() {
            nav.handle(&mut self.store, NavInput::StepForward, now);
            now += delay + Duration::from_millis(1);
            nav.tick(now);
            lines.push(RoundLine {
                label: round_label(&self.store),
                announcement: nav.sink().announcements.last().cloned(),
            });
        }
        lines
    }
}

#[derive(Debug, Serialize)]
pub struct RoundsInfo {
    pub shape_type: Option<String>,
    pub total_rounds: u32,
    pub current_round: u32,
    pub three_d: bool,
}

#[derive(Debug, Serialize)]
pub struct RoundLine {
    pub label: String,
    pub announcement: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchview_core::{RenderNode, VisualizationFrame};
    use stitchview_renderer::LodLevel;

    fn session(rounds: u32) -> Session {
        let mut session = Session::new(ViewerConfig::default());
        let frames = (1..=rounds)
            .map(|r| {
                let nodes = (0..r * 6)
                    .map(|i| RenderNode::new(&format!("r{}s{}", r, i), "sc", 10.0 * i as f64, 0.0))
                    .collect();
                VisualizationFrame::new(r, nodes, vec![])
            })
            .collect();
        session.store.set_frames(frames, Some("flat".to_string()));
        session
    }

    #[test]
    fn test_render_clamps_round_only() {
        let mut session = session(3);
        let list = session.render(10, 1.0);
        assert_eq!(session.store.state().current_round, 3);
        assert_eq!(list.node_count(), 36);
    }

    #[test]
    fn test_render_scale_and_size_reach_viewport() {
        let mut session = session(1);
        session.set_surface_size(800.0, 200.0);
        let list = session.render(1, 0.25);
        assert_eq!(list.lod, LodLevel::Minimal);
        assert!((list.bounds.width() - (800.0 / 0.25 + 100.0)).abs() < 1e-10);
        assert!((list.bounds.max.y - (100.0 / 0.25 + 50.0)).abs() < 1e-10);
        assert_eq!(session.store.state().zoom_level, 1.0);

        assert_eq!(session.render(1, 2.0).lod, LodLevel::Full);
    }

    #[test]
    fn test_pick_at_surface_center() {
        let mut session = session(1);
        // r1s0 sits at the content origin, the center of a 400x400 surface.
        let hit = session.pick(1, 1.0, Point::new(200.0, 200.0));
        assert_eq!(hit.as_deref(), Some("r1s0"));
        assert_eq!(session.pick(1, 1.0, Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_walk_rounds_announces_each_round() {
        let mut session = session(3);
        let lines = session.walk_rounds();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].label, "Round 1 of 3");
        assert!(lines[0].announcement.is_none());
        assert_eq!(lines[2].announcement.as_deref(), Some("Round 3, 18 stitches"));
    }

    #[test]
    fn test_open_missing_payload() {
        let mut session = Session::new(ViewerConfig::default());
        let err = session.open_payload(Path::new("/no/such/payload.json")).unwrap_err();
        assert!(err.contains("unavailable"));
    }
}
