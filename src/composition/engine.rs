use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, warn};

use crate::{
    assets::{AssetBundle, AssetResolver, AudioDecoder, ResolvedAssets},
    config::Config,
    encode::{quality_to_crf, EncodeSettings, FfmpegEncoder},
    error::{AudioError, Result},
    render::{surface_resolution, Frame, FrameCompositor, FrameScheduler},
    timeline::Timeline,
};

/// Main composition engine that renders a narrated slideshow into one video
///
/// The engine follows a clear pipeline:
/// 1. Asset Resolution - decode narration, load intro/thumbnail/slides
/// 2. Timeline Planning - fix phase boundaries and per-slide windows
/// 3. Priming - write the narration scratch WAV and spawn the encoder
/// 4. Rendering - deterministic frame loop feeding the encoder
/// 5. Finalization - collect the encoded buffer
pub struct CompositionEngine {
    config: Config,
}

/// The finished composition: one playable, streamable MP4 buffer
#[derive(Debug, Clone)]
pub struct EncodedOutput {
    /// Encoded container bytes
    pub data: Vec<u8>,

    /// Rendered duration in seconds (narration plus tail)
    pub duration: f64,

    /// Number of video frames rendered
    pub frame_count: u64,
}

impl CompositionEngine {
    /// Create a new composition engine with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Render the bundle into an encoded video buffer.
    ///
    /// `on_progress` receives coarse stage notifications; detailed progress
    /// goes to the tracing log. Fails when the narration track is missing or
    /// undecodable, or when the encoder reports an error; missing visuals
    /// degrade to black instead of failing.
    pub async fn render(
        &self,
        bundle: &AssetBundle,
        mut on_progress: impl FnMut(&str),
    ) -> Result<EncodedOutput> {
        if bundle.audio.is_none() {
            return Err(AudioError::Missing.into());
        }

        info!("🎬 Starting reel composition");
        info!(
            "   Orientation: {}",
            if bundle.vertical { "vertical 720x1280" } else { "landscape 1280x720" }
        );
        info!("   Slides: {}", bundle.slides.len());

        on_progress("Initializing rendering engine...");

        let (width, height) = surface_resolution(bundle.vertical);
        let fps = self.config.video.fps;

        // ==========================================
        // PIPELINE STEP 1: ASSET RESOLUTION
        // ==========================================

        let assets = self.resolve_assets(bundle, width, height, fps).await?;

        // ==========================================
        // PIPELINE STEP 2: TIMELINE PLANNING
        // ==========================================

        let timeline = Timeline::plan(assets.audio.duration, assets.slides.len());
        info!(
            "⏱️  Timeline: intro {:.1}s, {} slides x {:.1}s, total {:.1}s",
            timeline.intro_duration,
            timeline.slide_count,
            timeline.slide_duration,
            timeline.total_duration
        );

        // ==========================================
        // PIPELINE STEP 3: PRIMING
        // ==========================================

        // The scratch directory is the run's only shared resource; the guard
        // releases it exactly once however the run settles.
        let scratch = ScratchDir::create()?;
        let wav_path = scratch.path().join("narration.wav");
        AudioDecoder::write_wav(&assets.audio, &wav_path)?;

        on_progress("Starting real-time rendering capture...");

        let settings = EncodeSettings {
            width,
            height,
            fps,
            codec: self.config.video.codec.clone(),
            preset: self.config.encoder.preset.clone(),
            crf: quality_to_crf(self.config.video.quality),
            audio_bitrate: self.config.encoder.audio_bitrate.clone(),
            duration_limit: timeline.total_duration,
            ffmpeg_path: self.config.encoder.ffmpeg_path.clone(),
        };
        let mut encoder = FfmpegEncoder::start(&settings, &wav_path)?;

        // ==========================================
        // PIPELINE STEP 4: RENDERING
        // ==========================================

        let mut surface = Frame::new_black(width, height);
        let mut compositor = FrameCompositor::new();
        let scheduler = FrameScheduler::new(fps);

        let frame_count = scheduler.run(
            &timeline,
            &assets,
            &mut surface,
            &mut compositor,
            &mut encoder,
        )?;

        // ==========================================
        // PIPELINE STEP 5: FINALIZATION
        // ==========================================

        let data = encoder.finish()?;

        info!(
            "🎉 Composition complete: {} frames, {:.1}s, {:.1} MB",
            frame_count,
            timeline.total_duration,
            data.len() as f64 / 1024.0 / 1024.0
        );

        Ok(EncodedOutput {
            data,
            duration: timeline.total_duration,
            frame_count,
        })
    }

    async fn resolve_assets(
        &self,
        bundle: &AssetBundle,
        width: u32,
        height: u32,
        fps: f64,
    ) -> Result<ResolvedAssets> {
        info!("🎵 Step 1: Resolving assets...");

        let resolver = AssetResolver::new(
            width,
            height,
            fps,
            self.config.encoder.ffmpeg_path.clone(),
        );
        resolver.resolve(bundle).await
    }
}

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Per-run scratch directory, removed exactly once when the run settles
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn create() -> Result<Self> {
        let id = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "reel_compositor_{}_{}",
            std::process::id(),
            id
        ));
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            warn!("Failed to remove scratch directory {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::types::DecodedAudio;
    use tempfile::tempdir;

    fn write_test_wav(path: &Path, seconds: f64) {
        let sample_rate = 8000u32;
        let samples = vec![0.05f32; (sample_rate as f64 * seconds) as usize];
        let audio = DecodedAudio {
            duration: samples.len() as f64 / sample_rate as f64,
            samples,
            sample_rate,
            channels: 1,
        };
        AudioDecoder::write_wav(&audio, path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_audio_rejects_before_any_progress() {
        let engine = CompositionEngine::new(Config::default());
        let bundle = AssetBundle::default();

        let mut messages: Vec<String> = vec![];
        let result = engine
            .render(&bundle, |msg| messages.push(msg.to_string()))
            .await;

        assert!(matches!(
            result,
            Err(crate::error::CompositorError::Audio(AudioError::Missing))
        ));
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_progress_order_and_encoder_failure() {
        let dir = tempdir().unwrap();
        let wav = dir.path().join("narration.wav");
        write_test_wav(&wav, 0.2);

        let mut config = Config::default();
        config.encoder.ffmpeg_path = "ffmpeg-definitely-not-installed".to_string();

        let engine = CompositionEngine::new(config);
        let bundle = AssetBundle {
            audio: Some(wav),
            ..AssetBundle::default()
        };

        let mut messages: Vec<String> = vec![];
        let result = engine
            .render(&bundle, |msg| messages.push(msg.to_string()))
            .await;

        // The encoder is unavailable, so the run rejects after priming
        assert!(matches!(
            result,
            Err(crate::error::CompositorError::Encode(_))
        ));

        assert_eq!(
            messages,
            vec![
                "Initializing rendering engine...".to_string(),
                "Starting real-time rendering capture...".to_string(),
            ]
        );
    }

    #[test]
    fn test_scratch_dir_released_on_drop() {
        let path = {
            let scratch = ScratchDir::create().unwrap();
            assert!(scratch.path().is_dir());
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
