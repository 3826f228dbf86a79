use tracing::info;

use crate::assets::audio::AudioDecoder;
use crate::assets::types::{AssetBundle, LoadedVisual, ResolvedAssets};
use crate::assets::visual::VisualLoader;
use crate::error::{AudioError, Result};

/// Resolves an [`AssetBundle`] into decoded, render-ready assets
///
/// The narration decode and every visual load run concurrently; each visual
/// settles into its own slot and the combined result preserves the input
/// slide order. Only the narration track is fatal when it fails.
pub struct AssetResolver {
    visuals: VisualLoader,
}

impl AssetResolver {
    pub fn new(surface_width: u32, surface_height: u32, fps: f64, ffmpeg_path: String) -> Self {
        Self {
            visuals: VisualLoader::new(surface_width, surface_height, fps, ffmpeg_path),
        }
    }

    /// Resolve all assets; returns once every load has settled
    pub async fn resolve(&self, bundle: &AssetBundle) -> Result<ResolvedAssets> {
        let audio_path = bundle.audio.clone().ok_or(AudioError::Missing)?;

        // Slides fan out as independent tasks; results are collected in
        // input order regardless of which loads finish first.
        let slide_tasks: Vec<_> = bundle
            .slides
            .iter()
            .cloned()
            .map(|path| tokio::spawn(VisualLoader::load_still(path)))
            .collect();

        let intro_fut = async {
            match bundle.intro_video.clone() {
                Some(path) => self.visuals.load_intro_video(path).await,
                None => LoadedVisual::Missing,
            }
        };

        let thumbnail_fut = async {
            match bundle.thumbnail.clone() {
                Some(path) => VisualLoader::load_still(path).await,
                None => LoadedVisual::Missing,
            }
        };

        let (audio, intro, thumbnail) =
            tokio::join!(AudioDecoder::decode(audio_path), intro_fut, thumbnail_fut);
        let audio = audio?;

        let mut slides = Vec::with_capacity(slide_tasks.len());
        for task in slide_tasks {
            slides.push(task.await.unwrap_or(LoadedVisual::Missing));
        }

        let usable_slides = slides.iter().filter(|s| !s.is_missing()).count();
        info!(
            "Assets resolved: {:.1}s narration, intro {}, thumbnail {}, {}/{} slides usable",
            audio.duration,
            if intro.is_missing() { "missing" } else { "ready" },
            if thumbnail.is_missing() { "missing" } else { "ready" },
            usable_slides,
            slides.len()
        );

        Ok(ResolvedAssets {
            audio,
            intro,
            thumbnail,
            slides,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::types::DecodedAudio;
    use image::RgbImage;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_test_wav(path: &std::path::Path, seconds: f64) {
        let sample_rate = 8000u32;
        let samples = vec![0.1f32; (sample_rate as f64 * seconds) as usize];
        let audio = DecodedAudio {
            duration: samples.len() as f64 / sample_rate as f64,
            samples,
            sample_rate,
            channels: 1,
        };
        AudioDecoder::write_wav(&audio, path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_audio_is_fatal() {
        let resolver = AssetResolver::new(1280, 720, 30.0, "ffmpeg".to_string());
        let bundle = AssetBundle::default();

        let result = resolver.resolve(&bundle).await;
        assert!(matches!(
            result,
            Err(crate::error::CompositorError::Audio(AudioError::Missing))
        ));
    }

    #[tokio::test]
    async fn test_visual_failures_degrade_and_order_is_preserved() {
        let dir = tempdir().unwrap();

        let wav = dir.path().join("narration.wav");
        write_test_wav(&wav, 0.5);

        let good_a = dir.path().join("01_first.png");
        RgbImage::new(4, 4).save(&good_a).unwrap();

        let broken = dir.path().join("02_broken.png");
        let mut file = std::fs::File::create(&broken).unwrap();
        file.write_all(b"garbage").unwrap();

        let good_b = dir.path().join("03_last.png");
        RgbImage::new(8, 2).save(&good_b).unwrap();

        let bundle = AssetBundle {
            audio: Some(wav),
            intro_video: None,
            thumbnail: Some(PathBuf::from("missing_thumb.png")),
            slides: vec![good_a, broken, good_b],
            vertical: false,
        };

        let resolver = AssetResolver::new(1280, 720, 30.0, "ffmpeg".to_string());
        let assets = resolver.resolve(&bundle).await.unwrap();

        assert!((assets.audio.duration - 0.5).abs() < 1e-6);
        assert!(assets.intro.is_missing());
        assert!(assets.thumbnail.is_missing());

        assert_eq!(assets.slides.len(), 3);
        assert!(matches!(&assets.slides[0], LoadedVisual::Image(img) if img.width() == 4));
        assert!(assets.slides[1].is_missing());
        assert!(matches!(&assets.slides[2], LoadedVisual::Image(img) if img.width() == 8));
    }

    #[tokio::test]
    async fn test_audio_only_bundle_resolves() {
        let dir = tempdir().unwrap();
        let wav = dir.path().join("narration.wav");
        write_test_wav(&wav, 0.25);

        let bundle = AssetBundle {
            audio: Some(wav),
            ..AssetBundle::default()
        };

        let resolver = AssetResolver::new(720, 1280, 30.0, "ffmpeg".to_string());
        let assets = resolver.resolve(&bundle).await.unwrap();

        assert!(assets.intro.is_missing());
        assert!(assets.thumbnail.is_missing());
        assert!(assets.slides.is_empty());
    }
}
