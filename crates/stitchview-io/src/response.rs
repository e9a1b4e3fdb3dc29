//! Decoding of frame-provider payloads.
//!
//! A payload is the JSON object `{frames, total_rounds, shape_type}`. Decoding
//! is strict about shape but lenient about content: dangling edge ids and
//! round-number gaps are logged, never rejected, since the renderer tolerates
//! them.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use stitchview_core::{FrameProvider, ProviderError, VisualizationResponse};

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid visualization payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ResponseError> for ProviderError {
    fn from(e: ResponseError) -> Self {
        match e {
            ResponseError::Io(e) => ProviderError::Unavailable(e.to_string()),
            ResponseError::Json(e) => ProviderError::Decode(e),
        }
    }
}

pub fn parse_response(json: &str) -> Result<VisualizationResponse, ResponseError> {
    let response: VisualizationResponse = serde_json::from_str(json)?;
    inspect(&response);
    Ok(response)
}

pub fn read_response<R: Read>(reader: R) -> Result<VisualizationResponse, ResponseError> {
    let response: VisualizationResponse = serde_json::from_reader(reader)?;
    inspect(&response);
    Ok(response)
}

pub fn load_response(path: &Path) -> Result<VisualizationResponse, ResponseError> {
    let file = File::open(path)?;
    log::info!("Reading visualization payload from {}", path.display());
    read_response(BufReader::new(file))
}

/// Log anything in the payload the renderer will silently work around.
fn inspect(response: &VisualizationResponse) {
    if response.total_rounds as usize != response.frames.len() {
        log::warn!(
            "total_rounds is {} but {} frames were sent",
            response.total_rounds,
            response.frames.len()
        );
    }
    for (i, frame) in response.frames.iter().enumerate() {
        if frame.round_number as usize != i + 1 {
            log::warn!("Frame {} is labelled round {}", i, frame.round_number);
        }
        let dangling = frame
            .edges
            .iter()
            .filter(|e| frame.node(&e.source).is_none() || frame.node(&e.target).is_none())
            .count();
        if dangling > 0 {
            log::debug!(
                "Round {}: {} edges reference ids outside the frame",
                frame.round_number,
                dangling
            );
        }
    }
}

/// Frame provider backed by a payload file on disk. The pattern description
/// is ignored; every request yields the file's contents.
#[derive(Debug, Clone)]
pub struct FileFrameProvider {
    path: PathBuf,
}

impl FileFrameProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameProvider for FileFrameProvider {
    fn visualize(&self, _pattern: &Value) -> Result<VisualizationResponse, ProviderError> {
        Ok(load_response(&self.path)?)
    }
}
