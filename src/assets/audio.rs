use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::assets::types::DecodedAudio;
use crate::error::{AudioError, Result};

/// Narration track decoder
///
/// Any failure here is fatal for the whole run: the composition has no
/// audio-less mode.
pub struct AudioDecoder;

impl AudioDecoder {
    /// Decode an audio file into interleaved f32 samples
    pub async fn decode<P: AsRef<Path>>(path: P) -> Result<DecodedAudio> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "wav" => Self::decode_wav(path),
            "mp3" | "flac" | "ogg" | "m4a" | "aac" => Self::decode_with_symphonia(path),
            _ => Err(AudioError::UnsupportedFormat { format: extension }.into()),
        }
    }

    /// Decode WAV files using the hound crate (most reliable for WAV)
    fn decode_wav(path: &Path) -> Result<DecodedAudio> {
        let reader = hound::WavReader::open(path).map_err(|_| AudioError::LoadFailed {
            path: path.display().to_string(),
        })?;

        let spec = reader.spec();
        let sample_rate = spec.sample_rate;
        let channels = spec.channels;

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| AudioError::LoadFailed {
                    path: path.display().to_string(),
                })?,
            hound::SampleFormat::Int => {
                let bit_depth = spec.bits_per_sample;
                let samples: std::result::Result<Vec<i32>, _> =
                    reader.into_samples().collect();

                samples
                    .map_err(|_| AudioError::LoadFailed {
                        path: path.display().to_string(),
                    })?
                    .into_iter()
                    .map(|sample| Self::int_to_float(sample, bit_depth))
                    .collect()
            }
        };

        Self::finish(samples, sample_rate, channels)
    }

    /// Decode compressed formats using Symphonia
    fn decode_with_symphonia(path: &Path) -> Result<DecodedAudio> {
        let file = File::open(path).map_err(|_| AudioError::LoadFailed {
            path: path.display().to_string(),
        })?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(extension);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &fmt_opts, &meta_opts)
            .map_err(|_| AudioError::LoadFailed {
                path: path.display().to_string(),
            })?;

        let mut format = probed.format;

        // Find the first audio track with a known (decodable) codec
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::LoadFailed {
                path: path.display().to_string(),
            })?;

        let track_id = track.id;
        let codec_params = &track.codec_params;

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| AudioError::InvalidParameters {
                details: "No sample rate found".to_string(),
            })?;

        let channels = codec_params
            .channels
            .ok_or_else(|| AudioError::InvalidParameters {
                details: "No channel information found".to_string(),
            })?
            .count() as u16;

        let dec_opts: DecoderOptions = Default::default();
        let mut decoder = symphonia::default::get_codecs()
            .make(codec_params, &dec_opts)
            .map_err(|_| AudioError::LoadFailed {
                path: path.display().to_string(),
            })?;

        let mut samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                Err(SymphoniaError::IoError(_)) => break, // End of stream
                Err(_) => break,
            };

            while !format.metadata().is_latest() {
                format.metadata().pop();
            }

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => Self::convert_audio_buffer_to_f32(&decoded, &mut samples),
                Err(SymphoniaError::IoError(_)) => break,
                Err(SymphoniaError::DecodeError(_)) => continue,
                Err(_) => break,
            }
        }

        Self::finish(samples, sample_rate, channels)
    }

    fn finish(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Result<DecodedAudio> {
        if samples.is_empty() || sample_rate == 0 || channels == 0 {
            return Err(AudioError::InvalidParameters {
                details: "Decoded audio is empty".to_string(),
            }
            .into());
        }

        let duration = samples.len() as f64 / (sample_rate as f64 * channels as f64);

        Ok(DecodedAudio {
            samples,
            sample_rate,
            channels,
            duration,
        })
    }

    /// Render decoded samples back out as a WAV file for the encoder to mux
    pub fn write_wav<P: AsRef<Path>>(audio: &DecodedAudio, path: P) -> Result<()> {
        let spec = hound::WavSpec {
            channels: audio.channels,
            sample_rate: audio.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };

        let mut writer = hound::WavWriter::create(path.as_ref(), spec)
            .map_err(|e| crate::error::CompositorError::generic(format!(
                "Failed to create narration scratch WAV: {}", e
            )))?;

        for &sample in &audio.samples {
            writer.write_sample(sample).map_err(|e| {
                crate::error::CompositorError::generic(format!(
                    "Failed to write narration scratch WAV: {}", e
                ))
            })?;
        }

        writer.finalize().map_err(|e| {
            crate::error::CompositorError::generic(format!(
                "Failed to finalize narration scratch WAV: {}", e
            ))
        })?;

        Ok(())
    }

    /// Convert integer sample to float (-1.0 to 1.0)
    fn int_to_float(sample: i32, bit_depth: u16) -> f32 {
        match bit_depth {
            8 => (sample as f32 - 128.0) / 128.0,
            16 => sample as f32 / 32768.0,
            24 => sample as f32 / 8388608.0,
            32 => sample as f32 / 2147483648.0,
            _ => sample as f32 / 32768.0, // Default to 16-bit
        }
    }

    /// Convert Symphonia audio buffer to f32 samples
    fn convert_audio_buffer_to_f32(buffer: &AudioBufferRef, output: &mut Vec<f32>) {
        match buffer {
            AudioBufferRef::F32(buf) => {
                let channels = buf.spec().channels.count();
                let frames = buf.capacity();

                for frame_idx in 0..frames {
                    for ch in 0..channels {
                        let channel_buf = buf.chan(ch);
                        if frame_idx < channel_buf.len() {
                            output.push(channel_buf[frame_idx]);
                        }
                    }
                }
            }
            AudioBufferRef::F64(buf) => {
                let channels = buf.spec().channels.count();
                let frames = buf.capacity();

                for frame_idx in 0..frames {
                    for ch in 0..channels {
                        let channel_buf = buf.chan(ch);
                        if frame_idx < channel_buf.len() {
                            output.push(channel_buf[frame_idx] as f32);
                        }
                    }
                }
            }
            AudioBufferRef::S32(buf) => {
                let channels = buf.spec().channels.count();
                let frames = buf.capacity();

                for frame_idx in 0..frames {
                    for ch in 0..channels {
                        let channel_buf = buf.chan(ch);
                        if frame_idx < channel_buf.len() {
                            output.push(channel_buf[frame_idx] as f32 / 2147483648.0);
                        }
                    }
                }
            }
            AudioBufferRef::S16(buf) => {
                let channels = buf.spec().channels.count();
                let frames = buf.capacity();

                for frame_idx in 0..frames {
                    for ch in 0..channels {
                        let channel_buf = buf.chan(ch);
                        if frame_idx < channel_buf.len() {
                            output.push(channel_buf[frame_idx] as f32 / 32768.0);
                        }
                    }
                }
            }
            _ => {
                tracing::warn!("Unsupported audio buffer format, skipping packet");
            }
        }
    }

    /// Detect audio format from file extension
    pub fn detect_format<P: AsRef<Path>>(path: P) -> Option<String> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// Check if a file format is supported
    pub fn is_format_supported(extension: &str) -> bool {
        matches!(
            extension.to_lowercase().as_str(),
            "wav" | "mp3" | "flac" | "ogg" | "m4a" | "aac"
        )
    }
}
