use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for the Reel-Compositor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Video output settings
    pub video: VideoParams,

    /// Encoder settings
    pub encoder: EncoderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            video: VideoParams::default(),
            encoder: EncoderConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string(),
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.video.validate()?;
        self.encoder.validate()?;
        Ok(())
    }
}

/// Video output parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoParams {
    /// Target frame rate for output
    pub fps: f64,

    /// Video codec to use for output
    pub codec: String,

    /// Quality setting (0-100, higher is better)
    pub quality: u8,
}

impl Default for VideoParams {
    fn default() -> Self {
        Self {
            fps: 30.0,
            codec: "libx264".to_string(),
            quality: 85,
        }
    }
}

impl VideoParams {
    fn validate(&self) -> Result<()> {
        if !(1.0..=120.0).contains(&self.fps) {
            return Err(ConfigError::InvalidValue {
                key: "video.fps".to_string(),
                value: self.fps.to_string(),
            }
            .into());
        }

        if self.quality > 100 {
            return Err(ConfigError::InvalidValue {
                key: "video.quality".to_string(),
                value: self.quality.to_string(),
            }
            .into());
        }

        if self.codec.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "video.codec".to_string(),
                value: self.codec.clone(),
            }
            .into());
        }

        Ok(())
    }
}

/// Encoder process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// FFmpeg binary to invoke
    pub ffmpeg_path: String,

    /// x264 speed/size preset
    pub preset: String,

    /// AAC audio bitrate for the narration track
    pub audio_bitrate: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            preset: "veryfast".to_string(),
            audio_bitrate: "192k".to_string(),
        }
    }
}

impl EncoderConfig {
    fn validate(&self) -> Result<()> {
        if self.ffmpeg_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "encoder.ffmpeg_path".to_string(),
                value: self.ffmpeg_path.clone(),
            }
            .into());
        }

        if self.audio_bitrate.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "encoder.audio_bitrate".to_string(),
                value: self.audio_bitrate.clone(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let original_config = Config::default();

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config.video.fps, loaded_config.video.fps);
        assert_eq!(original_config.video.quality, loaded_config.video.quality);
        assert_eq!(
            original_config.encoder.ffmpeg_path,
            loaded_config.encoder.ffmpeg_path
        );
    }

    #[test]
    fn test_invalid_fps() {
        let mut config = Config::default();
        config.video.fps = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_quality() {
        let mut config = Config::default();
        config.video.quality = 150;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::from_file("does/not/exist.toml");
        assert!(result.is_err());
    }
}
