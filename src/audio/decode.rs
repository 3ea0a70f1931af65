//! Audio file decoding through the system `ffmpeg`.

use std::path::Path;
use std::process::Command;

use crate::audio::track::AudioTrack;
use crate::foundation::error::{HerodoError, HerodoResult};

/// Turns an audio file into PCM at a requested format.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, path: &Path, sample_rate: u32, channels: u16) -> HerodoResult<AudioTrack>;
}

/// Decodes by piping `ffmpeg -f f32le` output from a child process.
#[derive(Clone, Debug)]
pub struct FfmpegAudioDecoder {
    program: String,
}

impl FfmpegAudioDecoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfmpegAudioDecoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl AudioDecoder for FfmpegAudioDecoder {
    fn decode(&self, path: &Path, sample_rate: u32, channels: u16) -> HerodoResult<AudioTrack> {
        if !path.is_file() {
            return Err(HerodoError::decode(format!(
                "audio file '{}' does not exist",
                path.display()
            )));
        }

        let out = Command::new(&self.program)
            .args(["-v", "error", "-i"])
            .arg(path)
            .args([
                "-vn",
                "-f",
                "f32le",
                "-acodec",
                "pcm_f32le",
                "-ac",
                &channels.to_string(),
                "-ar",
                &sample_rate.to_string(),
                "pipe:1",
            ])
            .output()
            .map_err(|e| HerodoError::decode(format!("failed to run ffmpeg for audio decode: {e}")))?;

        if !out.status.success() {
            return Err(HerodoError::decode(format!(
                "ffmpeg audio decode failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let pcm = pcm_from_f32le(&out.stdout)?;
        if pcm.is_empty() {
            return Err(HerodoError::decode(format!(
                "'{}' contains no audio samples",
                path.display()
            )));
        }
        AudioTrack::new(sample_rate, channels, pcm)
    }
}

/// Reinterpret raw little-endian bytes as `f32` samples.
pub(crate) fn pcm_from_f32le(bytes: &[u8]) -> HerodoResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(HerodoError::decode(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/audio/decode.rs"]
mod tests;
