use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use tracing::debug;

use crate::error::EncodeError;
use crate::render::Frame;

/// Parameters for one encoding run
#[derive(Debug, Clone)]
pub struct EncodeSettings {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub codec: String,
    pub preset: String,
    pub crf: u8,
    pub audio_bitrate: String,

    /// Container duration cap in seconds (narration plus tail)
    pub duration_limit: f64,

    /// FFmpeg binary to invoke
    pub ffmpeg_path: String,
}

/// Check whether the configured ffmpeg binary can be executed
pub fn is_ffmpeg_available(ffmpeg_path: &str) -> bool {
    Command::new(ffmpeg_path)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Map a 0-100 quality setting onto the x264 CRF scale (lower is better)
pub fn quality_to_crf(quality: u8) -> u8 {
    let quality = quality.min(100);
    51 - ((quality as f32 / 100.0) * 51.0) as u8
}

/// Incremental AV encoder backed by the system `ffmpeg` binary
///
/// Raw RGB frames stream into the child's stdin while a reader thread drains
/// the fragmented-MP4 output from its stdout chunk by chunk, so no part of
/// the pipeline needs the whole timeline in advance. [`finish`] closes the
/// stream, checks the exit status and concatenates the buffered chunks into
/// the final byte buffer.
///
/// [`finish`]: FfmpegEncoder::finish
pub struct FfmpegEncoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout_reader: Option<JoinHandle<Vec<Vec<u8>>>>,
    stderr_reader: Option<JoinHandle<String>>,
    frames_written: u64,
}

impl FfmpegEncoder {
    /// Spawn the encoder process and start draining its output
    pub fn start(
        settings: &EncodeSettings,
        audio_wav: &Path,
    ) -> std::result::Result<Self, EncodeError> {
        if !is_ffmpeg_available(&settings.ffmpeg_path) {
            return Err(EncodeError::FfmpegMissing);
        }

        let mut cmd = Command::new(&settings.ffmpeg_path);
        cmd.args(build_args(settings, audio_wav))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| EncodeError::SpawnFailed {
            reason: e.to_string(),
        })?;

        let stdin = child.stdin.take().ok_or_else(|| EncodeError::SpawnFailed {
            reason: "encoder stdin unavailable".to_string(),
        })?;
        let mut stdout = child.stdout.take().ok_or_else(|| EncodeError::SpawnFailed {
            reason: "encoder stdout unavailable".to_string(),
        })?;
        let mut stderr = child.stderr.take().ok_or_else(|| EncodeError::SpawnFailed {
            reason: "encoder stderr unavailable".to_string(),
        })?;

        // Drain stdout as chunks arrive; blocking here would deadlock the
        // frame writer against a full pipe.
        let stdout_reader = std::thread::spawn(move || {
            let mut chunks = Vec::new();
            let mut buf = [0u8; 64 * 1024];
            loop {
                match stdout.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => chunks.push(buf[..n].to_vec()),
                    Err(_) => break,
                }
            }
            chunks
        });

        let stderr_reader = std::thread::spawn(move || {
            let mut text = String::new();
            let _ = stderr.read_to_string(&mut text);
            text
        });

        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout_reader: Some(stdout_reader),
            stderr_reader: Some(stderr_reader),
            frames_written: 0,
        })
    }

    /// Stream one raw RGB frame into the encoder
    pub fn write_frame(&mut self, frame: &Frame) -> std::result::Result<(), EncodeError> {
        let frames_written = self.frames_written;
        let stdin = self.stdin.as_mut().ok_or_else(|| EncodeError::EncodingFailed {
            reason: "encoder already finalized".to_string(),
        })?;

        stdin
            .write_all(frame.as_raw())
            .map_err(|e| EncodeError::EncodingFailed {
                reason: format!("failed to feed frame {}: {}", frames_written, e),
            })?;

        self.frames_written += 1;
        Ok(())
    }

    /// Number of frames streamed so far
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Close the stream and return the concatenated encoded bytes
    pub fn finish(mut self) -> std::result::Result<Vec<u8>, EncodeError> {
        // Closing stdin signals end-of-stream to ffmpeg
        drop(self.stdin.take());

        let chunks = match self.stdout_reader.take() {
            Some(handle) => handle.join().unwrap_or_default(),
            None => Vec::new(),
        };
        let stderr_text = match self.stderr_reader.take() {
            Some(handle) => handle.join().unwrap_or_default(),
            None => String::new(),
        };

        let status = self.child.wait().map_err(|e| EncodeError::EncodingFailed {
            reason: e.to_string(),
        })?;

        if !status.success() {
            return Err(EncodeError::EncodingFailed {
                reason: format!("ffmpeg exited with {}: {}", status, stderr_text.trim()),
            });
        }

        let total: usize = chunks.iter().map(|c| c.len()).sum();
        let mut data = Vec::with_capacity(total);
        for chunk in &chunks {
            data.extend_from_slice(chunk);
        }

        if data.is_empty() {
            return Err(EncodeError::EncodingFailed {
                reason: "encoder produced no output".to_string(),
            });
        }

        debug!(
            "Encoder finalized: {} frames in, {} chunks / {} bytes out",
            self.frames_written,
            chunks.len(),
            data.len()
        );

        Ok(data)
    }
}

impl super::FrameSink for FfmpegEncoder {
    fn write_frame(&mut self, frame: &Frame) -> std::result::Result<(), EncodeError> {
        FfmpegEncoder::write_frame(self, frame)
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        // A run that errored out mid-stream leaves the child alive
        if self.stdin.is_some() {
            drop(self.stdin.take());
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn build_args(settings: &EncodeSettings, audio_path: &Path) -> Vec<String> {
    vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        // Raw frames on stdin
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgb24".into(),
        "-s".into(),
        format!("{}x{}", settings.width, settings.height),
        "-r".into(),
        settings.fps.to_string(),
        "-i".into(),
        "-".into(),
        // Narration track
        "-i".into(),
        audio_path.display().to_string(),
        "-c:v".into(),
        settings.codec.clone(),
        "-preset".into(),
        settings.preset.clone(),
        "-crf".into(),
        settings.crf.to_string(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        settings.audio_bitrate.clone(),
        "-t".into(),
        format!("{:.3}", settings.duration_limit),
        // Fragmented MP4 so the container can stream to stdout
        "-movflags".into(),
        "frag_keyframe+empty_moov".into(),
        "-f".into(),
        "mp4".into(),
        "-".into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_settings() -> EncodeSettings {
        EncodeSettings {
            width: 1280,
            height: 720,
            fps: 30.0,
            codec: "libx264".to_string(),
            preset: "veryfast".to_string(),
            crf: 8,
            audio_bitrate: "192k".to_string(),
            duration_limit: 30.5,
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }

    #[test]
    fn test_quality_to_crf() {
        assert_eq!(quality_to_crf(100), 0);
        assert_eq!(quality_to_crf(85), 8);
        assert_eq!(quality_to_crf(0), 51);
        // Out-of-range input saturates instead of wrapping
        assert_eq!(quality_to_crf(255), 0);
    }

    #[test]
    fn test_build_args_streaming_container() {
        let args = build_args(&test_settings(), &PathBuf::from("/tmp/narration.wav"));

        assert!(args.contains(&"rawvideo".to_string()));
        assert!(args.contains(&"1280x720".to_string()));
        assert!(args.contains(&"frag_keyframe+empty_moov".to_string()));
        assert!(args.contains(&"/tmp/narration.wav".to_string()));
        assert!(args.contains(&"30.500".to_string()));
        assert_eq!(args.last(), Some(&"-".to_string()));
    }

    #[test]
    fn test_missing_binary_is_detected() {
        assert!(!is_ffmpeg_available("ffmpeg-definitely-not-installed"));

        let mut settings = test_settings();
        settings.ffmpeg_path = "ffmpeg-definitely-not-installed".to_string();

        let result = FfmpegEncoder::start(&settings, &PathBuf::from("audio.wav"));
        assert!(matches!(result, Err(EncodeError::FfmpegMissing)));
    }
}
