use std::path::{Path, PathBuf};
use std::process::Command;

use image::RgbImage;
use tracing::{debug, warn};

use crate::assets::types::{IntroVideo, LoadedVisual};
use crate::render::Frame;
use crate::timeline::INTRO_DURATION_SECS;

/// Loader for the optional visuals: intro clip, thumbnail, slides
///
/// Nothing in here is fatal. A visual that cannot be loaded resolves to
/// [`LoadedVisual::Missing`] and the compositor renders black in its place.
pub struct VisualLoader {
    surface_width: u32,
    surface_height: u32,
    fps: f64,
    ffmpeg_path: String,
}

impl VisualLoader {
    pub fn new(surface_width: u32, surface_height: u32, fps: f64, ffmpeg_path: String) -> Self {
        Self {
            surface_width,
            surface_height,
            fps,
            ffmpeg_path,
        }
    }

    /// Load a still image (slide or thumbnail), degrading to `Missing`
    pub async fn load_still(path: PathBuf) -> LoadedVisual {
        let result = tokio::task::spawn_blocking(move || match image::open(&path) {
            Ok(img) => {
                let rgb = img.to_rgb8();
                debug!("Loaded still {:?} ({}x{})", path, rgb.width(), rgb.height());
                LoadedVisual::Image(rgb)
            }
            Err(e) => {
                warn!("Could not decode image {:?}: {}", path, e);
                LoadedVisual::Missing
            }
        })
        .await;

        result.unwrap_or(LoadedVisual::Missing)
    }

    /// Pre-decode the intro clip, degrading to `Missing` on any failure.
    ///
    /// Frames come out of ffmpeg already stretched to the surface size (the
    /// intro is drawn edge-to-edge, without aspect preservation) and capped
    /// at the intro window.
    pub async fn load_intro_video(&self, path: PathBuf) -> LoadedVisual {
        let ffmpeg = self.ffmpeg_path.clone();
        let (width, height, fps) = (self.surface_width, self.surface_height, self.fps);
        let display_path = path.display().to_string();

        let result = tokio::task::spawn_blocking(move || {
            Self::extract_intro_frames(&ffmpeg, &path, width, height, fps)
        })
        .await;

        match result {
            Ok(Ok(frames)) if !frames.is_empty() => {
                debug!("Decoded {} intro frames from {}", frames.len(), display_path);
                LoadedVisual::Video(IntroVideo::new(frames, fps))
            }
            Ok(Ok(_)) => {
                warn!("Intro clip {} decoded no frames", display_path);
                LoadedVisual::Missing
            }
            Ok(Err(reason)) => {
                warn!("Could not decode intro clip {}: {}", display_path, reason);
                LoadedVisual::Missing
            }
            Err(_) => LoadedVisual::Missing,
        }
    }

    fn extract_intro_frames(
        ffmpeg: &str,
        path: &Path,
        width: u32,
        height: u32,
        fps: f64,
    ) -> std::result::Result<Vec<Frame>, String> {
        let mut cmd = Command::new(ffmpeg);
        cmd.args(["-hide_banner", "-loglevel", "error"])
            .arg("-i")
            .arg(path)
            .arg("-t")
            .arg(INTRO_DURATION_SECS.to_string())
            .arg("-r")
            .arg(fps.to_string())
            .arg("-an")
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24"])
            .arg("-s")
            .arg(format!("{}x{}", width, height))
            .arg("-");

        let output = cmd
            .output()
            .map_err(|e| format!("failed to run ffmpeg: {}", e))?;

        if !output.status.success() {
            return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
        }

        let frame_len = (width * height * 3) as usize;
        let mut frames = Vec::with_capacity(output.stdout.len() / frame_len.max(1));

        for chunk in output.stdout.chunks_exact(frame_len) {
            if let Some(buffer) = RgbImage::from_raw(width, height, chunk.to_vec()) {
                frames.push(Frame::new(buffer));
            }
        }

        Ok(frames)
    }

    /// Check whether a path looks like a supported still image
    pub fn is_image_file<P: AsRef<Path>>(path: P) -> bool {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) => matches!(
                ext.to_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "bmp" | "gif" | "tiff" | "webp"
            ),
            None => false,
        }
    }
}
