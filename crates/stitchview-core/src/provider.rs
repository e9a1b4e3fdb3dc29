use serde_json::Value;
use thiserror::Error;

use crate::frame::VisualizationResponse;

/// Why the frame provider could not deliver a frame set.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("frame provider unavailable: {0}")]
    Unavailable(String),

    #[error("pattern rejected: {0}")]
    Rejected(String),

    #[error("malformed visualization payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of visualization frames for a pattern.
///
/// The pattern description is opaque to the engine; request construction and
/// transport belong to the implementor.
pub trait FrameProvider {
    fn visualize(&self, pattern: &Value) -> Result<VisualizationResponse, ProviderError>;
}

impl<F> FrameProvider for F
where
    F: Fn(&Value) -> Result<VisualizationResponse, ProviderError>,
{
    fn visualize(&self, pattern: &Value) -> Result<VisualizationResponse, ProviderError> {
        self(pattern)
    }
}

/// Handle for one in-flight fetch. Only the most recently issued ticket is
/// honoured when results come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(pub(crate) u64);
