//! # Stitchview Navigation
//!
//! Round scrubber controller. Maps step/jump/slider input onto the
//! visualization store and emits debounced screen-reader announcements when
//! the current round settles.

pub mod debounce;
pub mod controller;

pub use controller::{
    announcement_text, can_step_back, can_step_forward, round_label, AnnouncementSink, NavInput,
    RecordingSink, RoundNavigator, ANNOUNCE_DELAY,
};
pub use debounce::Debouncer;
