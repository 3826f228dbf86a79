//! # Asset Resolution Module
//!
//! Turns an [`AssetBundle`] of file references into decoded, render-ready
//! data: the narration track, the optional intro clip, the optional
//! thumbnail, and the ordered slides.
//!
//! The narration decode is the only fatal path. Every visual degrades to
//! [`LoadedVisual::Missing`] on failure and the run carries on.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reel_compositor::assets::{AssetBundle, AssetResolver};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let bundle = AssetBundle {
//!     audio: Some("narration.mp3".into()),
//!     slides: vec!["01_hook.png".into(), "02_payoff.png".into()],
//!     ..AssetBundle::default()
//! };
//!
//! let resolver = AssetResolver::new(1280, 720, 30.0, "ffmpeg".to_string());
//! let assets = resolver.resolve(&bundle).await?;
//! println!("narration runs {:.1}s", assets.audio.duration);
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod resolver;
pub mod types;
pub mod visual;

pub use audio::AudioDecoder;
pub use resolver::AssetResolver;
pub use types::{AssetBundle, DecodedAudio, IntroVideo, LoadedVisual, ResolvedAssets};
pub use visual::VisualLoader;
