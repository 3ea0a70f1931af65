//! Media duration lookup with a word-count fallback.

use std::path::Path;
use std::process::Command;

use crate::foundation::error::{DegradedFeature, HerodoError, HerodoResult};

/// Reports the playable length of a media file.
pub trait MediaProbe: Send + Sync {
    fn audio_duration(&self, path: &Path) -> HerodoResult<f64>;
}

/// Reads `format.duration` from `ffprobe -print_format json`.
#[derive(Clone, Debug)]
pub struct FfprobeProbe {
    program: String,
}

impl FfprobeProbe {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    format: Option<ProbeFormat>,
}

impl MediaProbe for FfprobeProbe {
    fn audio_duration(&self, path: &Path) -> HerodoResult<f64> {
        let out = Command::new(&self.program)
            .args(["-v", "error", "-print_format", "json", "-show_format"])
            .arg(path)
            .output()
            .map_err(|e| HerodoError::probe(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(HerodoError::probe(format!(
                "ffprobe failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        parse_probe_duration(&out.stdout)
    }
}

pub(crate) fn parse_probe_duration(json: &[u8]) -> HerodoResult<f64> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| HerodoError::probe(format!("ffprobe json parse failed: {e}")))?;
    let secs = parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .ok_or_else(|| HerodoError::probe("ffprobe reported no duration"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(HerodoError::probe(format!("ffprobe reported duration {secs}")));
    }
    Ok(secs)
}

/// Speaking time for `text` at `words_per_second`.
pub fn estimate_speech_duration(text: &str, words_per_second: f64) -> f64 {
    if words_per_second.is_nan() || words_per_second <= 0.0 {
        return 0.0;
    }
    text.split_whitespace().count() as f64 / words_per_second
}

/// Probe `path`, falling back to the word-count estimate for `text`.
///
/// The fallback is reported as a [`DegradedFeature::DurationEstimate`].
pub fn resolve_duration(
    probe: &dyn MediaProbe,
    path: &Path,
    text: &str,
    words_per_second: f64,
) -> (f64, Option<DegradedFeature>) {
    match probe.audio_duration(path) {
        Ok(secs) => (secs, None),
        Err(e) => {
            let estimated_secs = estimate_speech_duration(text, words_per_second);
            tracing::warn!(
                audio = %path.display(),
                error = %e,
                estimated_secs,
                "duration probe failed, using word-count estimate"
            );
            (
                estimated_secs,
                Some(DegradedFeature::DurationEstimate {
                    estimated_secs,
                    reason: e.to_string(),
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/probe.rs"]
mod tests;
