use thiserror::Error;

/// Main error type for the Reel-Compositor library
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Audio processing error: {0}")]
    Audio(#[from] AudioError),

    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Audio-specific errors
///
/// Every variant is fatal: the composition has no audio-less mode, so a run
/// aborts before any frame is rendered when the narration track cannot be
/// decoded.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Missing audio asset for rendering")]
    Missing,

    #[error("Failed to load audio file: {path}")]
    LoadFailed { path: String },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Invalid audio parameters: {details}")]
    InvalidParameters { details: String },
}

/// Encoder-specific errors
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("FFmpeg not found. Please install FFmpeg.")]
    FfmpegMissing,

    #[error("Failed to start encoder: {reason}")]
    SpawnFailed { reason: String },

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using CompositorError
pub type Result<T> = std::result::Result<T, CompositorError>;

impl CompositorError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Audio(AudioError::Missing) => {
                "No narration track was provided. A composition cannot be rendered without audio."
                    .to_string()
            }
            Self::Audio(AudioError::LoadFailed { path }) => {
                format!("Could not load audio file '{}'. Please check the file exists and is a supported format.", path)
            }
            Self::Encode(EncodeError::FfmpegMissing) => {
                "FFmpeg was not found on this system. Install it and make sure it is on PATH."
                    .to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_audio_message() {
        let err = CompositorError::from(AudioError::Missing);
        assert!(err.to_string().contains("Missing audio asset"));
        assert!(err.user_message().contains("narration"));
    }

    #[test]
    fn test_encode_error_wrapping() {
        let err: CompositorError = EncodeError::EncodingFailed {
            reason: "broken pipe".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            CompositorError::Encode(EncodeError::EncodingFailed { .. })
        ));
    }
}
