use std::time::{Duration, Instant};

use stitchview_core::VisualizationStore;

use crate::debounce::Debouncer;

/// How long a round must stay put before it is announced.
pub const ANNOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Host hook for screen-reader announcements.
pub trait AnnouncementSink {
    fn announce(&mut self, text: &str);
}

impl<F: FnMut(&str)> AnnouncementSink for F {
    fn announce(&mut self, text: &str) {
        self(text)
    }
}

/// Keeps every announcement; handy for hosts that poll and for tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub announcements: Vec<String>,
}

impl AnnouncementSink for RecordingSink {
    fn announce(&mut self, text: &str) {
        self.announcements.push(text.to_string());
    }
}

/// Discrete and continuous scrubber inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavInput {
    StepBack,
    StepForward,
    JumpFirst,
    JumpLast,
    /// Slider value, passed straight to `jump_to_round`.
    Scrub(i64),
}

pub fn announcement_text(round: u32, stitch_count: u32) -> String {
    format!("Round {}, {} stitches", round, stitch_count)
}

/// Scrubber caption, e.g. `Round 3 of 12`.
pub fn round_label(store: &VisualizationStore) -> String {
    let s = store.state();
    format!("Round {} of {}", s.current_round, s.total_rounds)
}

pub fn can_step_back(store: &VisualizationStore) -> bool {
    store.state().total_rounds > 0 && !store.is_first_round()
}

pub fn can_step_forward(store: &VisualizationStore) -> bool {
    !store.is_last_round()
}

/// Binds scrubber input to the store and announces settled rounds.
#[derive(Debug)]
pub struct RoundNavigator<S> {
    sink: S,
    debouncer: Debouncer<String>,
    /// Last round seen; `None` until the first observation.
    last_round: Option<u32>,
}

impl<S: AnnouncementSink> RoundNavigator<S> {
    pub fn new(sink: S) -> Self {
        Self::with_delay(sink, ANNOUNCE_DELAY)
    }

    pub fn with_delay(sink: S, delay: Duration) -> Self {
        Self {
            sink,
            debouncer: Debouncer::new(delay),
            last_round: None,
        }
    }

    /// Check the store for a round change. The first call only records the
    /// starting round; every later change re-arms the announcement.
    pub fn observe(&mut self, store: &VisualizationStore, now: Instant) {
        let round = store.state().current_round;
        match self.last_round.replace(round) {
            None => {}
            Some(previous) if previous == round => {}
            Some(previous) => {
                log::debug!("Round changed {} -> {}", previous, round);
                self.debouncer
                    .arm(now, announcement_text(round, store.current_stitch_count()));
            }
        }
    }

    /// Apply one input and observe the result.
    pub fn handle(&mut self, store: &mut VisualizationStore, input: NavInput, now: Instant) {
        self.observe(store, now);
        match input {
            NavInput::StepBack => {
                if can_step_back(store) {
                    store.prev_round();
                }
            }
            NavInput::StepForward => {
                if can_step_forward(store) {
                    store.next_round();
                }
            }
            NavInput::JumpFirst => {
                if !store.is_first_round() {
                    store.jump_to_round(1);
                }
            }
            NavInput::JumpLast => {
                if !store.is_last_round() {
                    store.jump_to_round(i64::from(store.state().total_rounds));
                }
            }
            NavInput::Scrub(value) => store.jump_to_round(value),
        }
        self.observe(store, now);
    }

    /// Deliver the pending announcement if it has settled. Returns whether
    /// anything was announced.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(text) => {
                self.sink.announce(&text);
                true
            }
            None => false,
        }
    }

    /// Drop any pending announcement, e.g. when the view is torn down.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
