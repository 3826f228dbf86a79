//! # Encoding Module
//!
//! Incremental AV encoding through the system `ffmpeg` binary: raw RGB
//! frames in, a fragmented MP4 byte buffer out.

pub mod ffmpeg;

pub use ffmpeg::{is_ffmpeg_available, quality_to_crf, EncodeSettings, FfmpegEncoder};

use crate::error::EncodeError;
use crate::render::Frame;

/// Anything that can consume rendered frames, one per tick
///
/// The scheduler only sees this seam, so rendering can be exercised against
/// an in-memory sink as well as the real encoder.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &Frame) -> std::result::Result<(), EncodeError>;
}
