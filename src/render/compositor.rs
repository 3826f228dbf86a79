use std::collections::HashMap;

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::assets::types::{LoadedVisual, ResolvedAssets};
use crate::render::frame::Frame;
use crate::timeline::{Phase, Timeline};

/// Placement of an asset scaled to fully cover a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    /// Uniform scale factor applied to the asset
    pub scale: f64,

    /// Top-left corner of the scaled asset on the surface (may be negative)
    pub x: i64,
    pub y: i64,

    /// Scaled asset dimensions
    pub width: u32,
    pub height: u32,
}

/// Cover-fit placement rule.
///
/// The asset is scaled uniformly by `max(W/w, H/h)` and centered, so it
/// covers the surface entirely and is cropped on the overflow axis. No
/// letterboxing.
pub fn cover_fit(
    surface_width: u32,
    surface_height: u32,
    asset_width: u32,
    asset_height: u32,
) -> CoverFit {
    let scale = (surface_width as f64 / asset_width as f64)
        .max(surface_height as f64 / asset_height as f64);

    let width = (asset_width as f64 * scale).round() as u32;
    let height = (asset_height as f64 * scale).round() as u32;
    let x = (surface_width as f64 / 2.0 - asset_width as f64 * scale / 2.0).round() as i64;
    let y = (surface_height as f64 / 2.0 - asset_height as f64 * scale / 2.0).round() as i64;

    CoverFit {
        scale,
        x,
        y,
        width,
        height,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ArtworkKey {
    Thumbnail,
    Slide(usize),
}

/// Renders the visual for a timestamp onto the surface
///
/// Pure with respect to its inputs apart from mutating the surface; the
/// internal cache only memoizes scaled artwork and never changes what is
/// drawn.
pub struct FrameCompositor {
    scaled: HashMap<ArtworkKey, RgbImage>,
}

impl FrameCompositor {
    pub fn new() -> Self {
        Self {
            scaled: HashMap::new(),
        }
    }

    /// Draw the frame for `elapsed` seconds into `surface`.
    ///
    /// The surface is cleared to black first, so missing or unusable assets
    /// simply leave a black frame.
    pub fn render(
        &mut self,
        surface: &mut Frame,
        elapsed: f64,
        timeline: &Timeline,
        assets: &ResolvedAssets,
    ) {
        surface.fill_black();

        match timeline.phase_at(elapsed) {
            Phase::Intro => {
                // An intro clip that is still playing wins; once finished
                // (or absent) the thumbnail takes over.
                if let LoadedVisual::Video(video) = &assets.intro {
                    if let Some(frame) = video.frame_at(elapsed) {
                        surface.copy_from(frame);
                        return;
                    }
                }

                if let LoadedVisual::Image(thumbnail) = &assets.thumbnail {
                    self.draw_cover(surface, ArtworkKey::Thumbnail, thumbnail);
                }
            }
            Phase::Slideshow => {
                if let Some(index) = timeline.slide_index_at(elapsed) {
                    if let Some(LoadedVisual::Image(slide)) = assets.slides.get(index) {
                        self.draw_cover(surface, ArtworkKey::Slide(index), slide);
                    }
                }
            }
        }
    }

    fn draw_cover(&mut self, surface: &mut Frame, key: ArtworkKey, image: &RgbImage) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }

        let fit = cover_fit(surface.width(), surface.height(), image.width(), image.height());
        let scaled = self
            .scaled
            .entry(key)
            .or_insert_with(|| imageops::resize(image, fit.width, fit.height, FilterType::Lanczos3));

        surface.blit(scaled, fit.x, fit.y);
    }
}

impl Default for FrameCompositor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::types::{DecodedAudio, IntroVideo};

    fn test_audio() -> DecodedAudio {
        DecodedAudio {
            samples: vec![0.0; 100],
            sample_rate: 8000,
            channels: 1,
            duration: 30.0,
        }
    }

    fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_fn(width, height, |_, _| image::Rgb(color))
    }

    fn assets_with(
        intro: LoadedVisual,
        thumbnail: LoadedVisual,
        slides: Vec<LoadedVisual>,
    ) -> ResolvedAssets {
        ResolvedAssets {
            audio: test_audio(),
            intro,
            thumbnail,
            slides,
        }
    }

    #[test]
    fn test_cover_fit_exact_fill() {
        let fit = cover_fit(1280, 720, 640, 360);
        assert_eq!(fit.scale, 2.0);
        assert_eq!((fit.width, fit.height), (1280, 720));
        assert_eq!((fit.x, fit.y), (0, 0));
    }

    #[test]
    fn test_cover_fit_crops_vertically() {
        // Square asset into a landscape surface: width drives the scale and
        // the overflow is cropped top/bottom, centered.
        let fit = cover_fit(1280, 720, 720, 720);
        assert!((fit.scale - 1280.0 / 720.0).abs() < 1e-9);
        assert_eq!(fit.width, 1280);
        assert_eq!(fit.height, 1280);
        assert_eq!(fit.x, 0);
        assert_eq!(fit.y, -280);
    }

    #[test]
    fn test_cover_fit_centers_both_axes() {
        let fit = cover_fit(20, 10, 10, 10);
        assert_eq!(fit.scale, 2.0);
        assert_eq!((fit.width, fit.height), (20, 20));
        assert_eq!((fit.x, fit.y), (0, -5));
    }

    #[test]
    fn test_intro_draws_thumbnail_when_no_video() {
        let timeline = Timeline::plan(30.0, 0);
        let assets = assets_with(
            LoadedVisual::Missing,
            LoadedVisual::Image(solid(10, 10, [200, 0, 0])),
            vec![],
        );

        let mut surface = Frame::new_black(20, 10);
        let mut compositor = FrameCompositor::new();
        compositor.render(&mut surface, 1.0, &timeline, &assets);

        assert_eq!(surface.get_pixel(10, 5), [200, 0, 0]);
    }

    #[test]
    fn test_intro_video_wins_over_thumbnail() {
        let timeline = Timeline::plan(30.0, 0);
        let video = IntroVideo::new(vec![Frame::new_filled(20, 10, [0, 0, 250])], 30.0);
        let assets = assets_with(
            LoadedVisual::Video(video),
            LoadedVisual::Image(solid(10, 10, [200, 0, 0])),
            vec![],
        );

        let mut surface = Frame::new_black(20, 10);
        let mut compositor = FrameCompositor::new();
        compositor.render(&mut surface, 0.0, &timeline, &assets);

        assert_eq!(surface.get_pixel(3, 3), [0, 0, 250]);
    }

    #[test]
    fn test_finished_intro_video_falls_back_to_thumbnail() {
        let timeline = Timeline::plan(30.0, 0);
        // One decoded frame: finished after 1/30s
        let video = IntroVideo::new(vec![Frame::new_filled(20, 10, [0, 0, 250])], 30.0);
        let assets = assets_with(
            LoadedVisual::Video(video),
            LoadedVisual::Image(solid(10, 10, [200, 0, 0])),
            vec![],
        );

        let mut surface = Frame::new_black(20, 10);
        let mut compositor = FrameCompositor::new();
        compositor.render(&mut surface, 5.0, &timeline, &assets);

        assert_eq!(surface.get_pixel(10, 5), [200, 0, 0]);
    }

    #[test]
    fn test_broken_thumbnail_leaves_intro_black() {
        let timeline = Timeline::plan(30.0, 0);
        let assets = assets_with(LoadedVisual::Missing, LoadedVisual::Missing, vec![]);

        let mut surface = Frame::new_filled(20, 10, [9, 9, 9]);
        let mut compositor = FrameCompositor::new();
        compositor.render(&mut surface, 2.0, &timeline, &assets);

        assert_eq!(surface.get_pixel(10, 5), [0, 0, 0]);
    }

    #[test]
    fn test_slideshow_selects_and_clamps_slides() {
        // 30s narration, 2 slides: 12s windows starting at 6s
        let timeline = Timeline::plan(30.0, 2);
        let assets = assets_with(
            LoadedVisual::Missing,
            LoadedVisual::Missing,
            vec![
                LoadedVisual::Image(solid(20, 10, [10, 0, 0])),
                LoadedVisual::Image(solid(20, 10, [0, 10, 0])),
            ],
        );

        let mut surface = Frame::new_black(20, 10);
        let mut compositor = FrameCompositor::new();

        compositor.render(&mut surface, 6.0, &timeline, &assets);
        assert_eq!(surface.get_pixel(10, 5), [10, 0, 0]);

        compositor.render(&mut surface, 18.5, &timeline, &assets);
        assert_eq!(surface.get_pixel(10, 5), [0, 10, 0]);

        // Beyond the last window the index clamps to the final slide
        compositor.render(&mut surface, 60.0, &timeline, &assets);
        assert_eq!(surface.get_pixel(10, 5), [0, 10, 0]);
    }

    #[test]
    fn test_missing_slide_renders_black() {
        let timeline = Timeline::plan(30.0, 2);
        let assets = assets_with(
            LoadedVisual::Missing,
            LoadedVisual::Missing,
            vec![
                LoadedVisual::Missing,
                LoadedVisual::Image(solid(20, 10, [0, 10, 0])),
            ],
        );

        let mut surface = Frame::new_filled(20, 10, [7, 7, 7]);
        let mut compositor = FrameCompositor::new();
        compositor.render(&mut surface, 7.0, &timeline, &assets);

        assert_eq!(surface.get_pixel(10, 5), [0, 0, 0]);
    }

    #[test]
    fn test_zero_slides_renders_black_slideshow() {
        let timeline = Timeline::plan(30.0, 0);
        let assets = assets_with(LoadedVisual::Missing, LoadedVisual::Missing, vec![]);

        let mut surface = Frame::new_black(20, 10);
        let mut compositor = FrameCompositor::new();
        compositor.render(&mut surface, 15.0, &timeline, &assets);

        assert_eq!(surface.get_pixel(0, 0), [0, 0, 0]);
        assert_eq!(surface.get_pixel(19, 9), [0, 0, 0]);
    }
}
