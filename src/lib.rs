//! # Reel-Compositor
//!
//! Assemble narrated short-form slideshow videos: a fixed-length intro
//! (a muted clip or a fallback thumbnail) followed by timed slides, all
//! synchronized to a single narration track and encoded into one playable
//! MP4 buffer.
//!
//! Rendering is deterministic: every frame is a pure function of its
//! timestamp, so a composition encodes at full speed and identical inputs
//! produce identical timelines and frame sequences.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reel_compositor::{
//!     assets::AssetBundle,
//!     composition::CompositionEngine,
//!     config::Config,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let bundle = AssetBundle {
//!     audio: Some("narration.mp3".into()),
//!     intro_video: Some("intro.mp4".into()),
//!     thumbnail: Some("cover.png".into()),
//!     slides: vec!["01_hook.png".into(), "02_story.png".into()],
//!     vertical: true,
//! };
//!
//! let engine = CompositionEngine::new(Config::default());
//! let output = engine.render(&bundle, |msg| println!("{msg}")).await?;
//!
//! std::fs::write("reel.mp4", &output.data)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`assets`] - Asset resolution: narration decode and degradable visuals
//! - [`timeline`] - Pure phase/window math for a run
//! - [`render`] - The raster surface, compositor, and frame scheduler
//! - [`encode`] - Incremental encoding through the system `ffmpeg` binary
//! - [`composition`] - The engine tying the pipeline together
//! - [`config`] - Configuration management
//!
//! ## Degradation policy
//!
//! Only the narration track is required. The intro clip, the thumbnail, and
//! each individual slide degrade to [`assets::LoadedVisual::Missing`] when
//! they cannot be loaded, and the compositor renders black in their place;
//! a run never fails because of a broken image.

pub mod assets;
pub mod composition;
pub mod config;
pub mod encode;
pub mod error;
pub mod render;
pub mod timeline;

// Re-export commonly used types for convenience
pub use crate::{
    assets::{AssetBundle, LoadedVisual},
    composition::{CompositionEngine, EncodedOutput},
    config::Config,
    error::{CompositorError, Result},
    timeline::Timeline,
};
