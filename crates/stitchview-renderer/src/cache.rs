use std::sync::Arc;

use stitchview_core::{FrameSetId, VisualizationState};

use crate::compositor::composite;
use crate::render_data::DrawList;
use crate::viewport::ViewportSpec;

/// Everything a draw list depends on: the frame set, the round, and the
/// viewport's width, height and scale. Store fields such as zoom, pan and
/// display preferences are not read; only the scale the host passes in a
/// `ViewportSpec` is keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub frame_set: Option<FrameSetId>,
    pub current_round: u32,
    viewport: [u64; 3],
}

impl CacheKey {
    pub fn new(state: &VisualizationState, viewport: &ViewportSpec) -> Self {
        Self {
            frame_set: state.frame_set_id,
            current_round: state.current_round,
            viewport: viewport.key(),
        }
    }
}

/// Single-entry memo for the compositor.
#[derive(Debug, Default)]
pub struct DrawListCache {
    entry: Option<(CacheKey, Arc<DrawList>)>,
    hits: u64,
    misses: u64,
}

impl DrawListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached list when the key matches, otherwise composite and
    /// replace the entry.
    pub fn get_or_composite(
        &mut self,
        state: &VisualizationState,
        viewport: &ViewportSpec,
    ) -> Arc<DrawList> {
        let key = CacheKey::new(state, viewport);
        if let Some((cached_key, list)) = &self.entry {
            if *cached_key == key {
                self.hits += 1;
                return Arc::clone(list);
            }
        }
        self.misses += 1;
        let list = Arc::new(composite(&state.frames, state.current_round, viewport));
        self.entry = Some((key, Arc::clone(&list)));
        list
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchview_core::{Point, RenderNode, VisualizationFrame, VisualizationStore};

    fn store() -> VisualizationStore {
        let mut store = VisualizationStore::new();
        store.set_frames(
            vec![
                VisualizationFrame::new(1, vec![RenderNode::new("a", "sc", 0.0, 0.0)], vec![]),
                VisualizationFrame::new(2, vec![RenderNode::new("b", "sc", 5.0, 0.0)], vec![]),
            ],
            None,
        );
        store
    }

    #[test]
    fn test_unrelated_changes_hit_cache() {
        let mut store = store();
        let mut cache = DrawListCache::new();
        let vp = ViewportSpec::new(400.0, 400.0, 1.0);

        let first = cache.get_or_composite(store.state(), &vp);
        store.zoom_in();
        store.set_pan_offset(Point::new(30.0, 30.0));
        store.set_show_stitch_count(false);
        let second = cache.get_or_composite(store.state(), &vp);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_key_changes_recompute() {
        let mut store = store();
        let mut cache = DrawListCache::new();
        let vp = ViewportSpec::new(400.0, 400.0, 1.0);

        let first = cache.get_or_composite(store.state(), &vp);
        store.next_round();
        let second = cache.get_or_composite(store.state(), &vp);
        assert!(!Arc::ptr_eq(&first, &second));

        let resized = cache.get_or_composite(store.state(), &ViewportSpec::new(800.0, 400.0, 1.0));
        assert!(!Arc::ptr_eq(&second, &resized));

        // Same content, new frame set identity.
        let frames = store.state().frames.clone();
        store.set_frames(frames, None);
        store.next_round();
        let replaced = cache.get_or_composite(store.state(), &ViewportSpec::new(800.0, 400.0, 1.0));
        assert!(!Arc::ptr_eq(&resized, &replaced));
        assert_eq!(cache.misses(), 4);
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn test_scale_change_recomputes() {
        let store = store();
        let mut cache = DrawListCache::new();
        let first = cache.get_or_composite(store.state(), &ViewportSpec::new(400.0, 400.0, 1.0));
        let zoomed = cache.get_or_composite(store.state(), &ViewportSpec::new(400.0, 400.0, 1.25));
        assert!(!Arc::ptr_eq(&first, &zoomed));
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_invalidate() {
        let store = store();
        let mut cache = DrawListCache::new();
        let vp = ViewportSpec::new(400.0, 400.0, 1.0);
        cache.get_or_composite(store.state(), &vp);
        cache.invalidate();
        cache.get_or_composite(store.state(), &vp);
        assert_eq!(cache.misses(), 2);
    }
}
