use std::path::PathBuf;

use image::RgbImage;

use crate::render::Frame;

/// The set of source assets for one composition run
///
/// Owned by the caller; the engine only reads it. Only the audio track is
/// required — every visual degrades to [`LoadedVisual::Missing`] when it
/// cannot be loaded.
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    /// Narration/music track. Required; a run fails without it.
    pub audio: Option<PathBuf>,

    /// Optional intro clip played during the intro phase
    pub intro_video: Option<PathBuf>,

    /// Optional still shown during the intro when no clip is available
    pub thumbnail: Option<PathBuf>,

    /// Ordered slideshow images
    pub slides: Vec<PathBuf>,

    /// Render 720x1280 portrait output instead of 1280x720 landscape
    pub vertical: bool,
}

/// Decoded narration track
///
/// Created once per run and released with the run's scratch state when the
/// run settles.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved f32 samples in [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Channel count
    pub channels: u16,

    /// Duration in seconds
    pub duration: f64,
}

/// A visual asset after resolution
///
/// Failed loads resolve to `Missing`, never to an error; the compositor
/// matches on the variant and renders black for anything unusable.
#[derive(Debug, Clone)]
pub enum LoadedVisual {
    /// An intro clip with pre-decoded frames
    Video(IntroVideo),

    /// A decoded still image
    Image(RgbImage),

    /// The asset was absent or failed to load
    Missing,
}

impl LoadedVisual {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Pre-decoded intro clip frames, already stretched to the surface size
#[derive(Debug, Clone)]
pub struct IntroVideo {
    frames: Vec<Frame>,
    fps: f64,
}

impl IntroVideo {
    pub fn new(frames: Vec<Frame>, fps: f64) -> Self {
        Self { frames, fps }
    }

    /// Frame for the given timestamp, or `None` once the clip has finished
    pub fn frame_at(&self, elapsed: f64) -> Option<&Frame> {
        let index = (elapsed * self.fps).floor().max(0.0) as usize;
        self.frames.get(index)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Everything the resolver produced for one run
#[derive(Debug, Clone)]
pub struct ResolvedAssets {
    pub audio: DecodedAudio,
    pub intro: LoadedVisual,
    pub thumbnail: LoadedVisual,
    pub slides: Vec<LoadedVisual>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intro_video_frame_lookup() {
        let frames = vec![
            Frame::new_filled(2, 2, [1, 0, 0]),
            Frame::new_filled(2, 2, [2, 0, 0]),
        ];
        let video = IntroVideo::new(frames, 30.0);

        assert_eq!(video.frame_at(0.0).unwrap().get_pixel(0, 0), [1, 0, 0]);
        assert_eq!(video.frame_at(0.04).unwrap().get_pixel(0, 0), [2, 0, 0]);

        // Past the last decoded frame the clip counts as finished
        assert!(video.frame_at(1.0).is_none());
    }

    #[test]
    fn test_missing_visual() {
        assert!(LoadedVisual::Missing.is_missing());
        assert!(!LoadedVisual::Image(RgbImage::new(1, 1)).is_missing());
    }
}
