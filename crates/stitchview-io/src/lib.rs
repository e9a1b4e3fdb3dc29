//! # Stitchview I/O
//!
//! JSON decoding for frame-provider payloads and the viewer configuration
//! file. Everything here is fallible and reports through `thiserror` enums;
//! the rendering crates never see an error.

pub mod response;
pub mod config;

pub use config::{ConfigError, ViewerConfig};
pub use response::{load_response, parse_response, read_response, FileFrameProvider, ResponseError};
