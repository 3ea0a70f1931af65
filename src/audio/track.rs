use std::sync::Arc;

use crate::foundation::error::{HerodoError, HerodoResult};

/// Interleaved `f32` PCM with its format.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    sample_rate: u32,
    channels: u16,
    samples: Arc<Vec<f32>>,
}

impl AudioTrack {
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> HerodoResult<Self> {
        if sample_rate == 0 || channels == 0 {
            return Err(HerodoError::invalid_argument(
                "audio sample rate and channel count must be non-zero",
            ));
        }
        if !samples.len().is_multiple_of(usize::from(channels)) {
            return Err(HerodoError::invalid_argument(format!(
                "{} samples do not divide into {channels} channels",
                samples.len()
            )));
        }
        Ok(Self {
            sample_rate,
            channels,
            samples: Arc::new(samples),
        })
    }

    /// `secs` of digital silence.
    pub fn silence(sample_rate: u32, channels: u16, secs: f64) -> HerodoResult<Self> {
        let frames = frames_for(secs, sample_rate);
        Self::new(sample_rate, channels, vec![0.0; frames * usize::from(channels)])
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Loop-then-trim to exactly `secs`.
    ///
    /// Repeats the track end to end as often as needed and cuts the excess. An empty track
    /// becomes silence.
    pub fn fit_to(&self, secs: f64) -> Self {
        let want = frames_for(secs, self.sample_rate) * usize::from(self.channels);
        let samples = if self.samples.is_empty() {
            vec![0.0; want]
        } else {
            self.samples.iter().copied().cycle().take(want).collect()
        };
        Self {
            sample_rate: self.sample_rate,
            channels: self.channels,
            samples: Arc::new(samples),
        }
    }

    /// Copy with every sample multiplied by `gain`.
    pub fn with_gain(&self, gain: f32) -> Self {
        Self {
            sample_rate: self.sample_rate,
            channels: self.channels,
            samples: Arc::new(self.samples.iter().map(|s| s * gain).collect()),
        }
    }

    /// Copy with every sample limited to `[-1, 1]`.
    pub fn clamped(&self) -> Self {
        Self {
            sample_rate: self.sample_rate,
            channels: self.channels,
            samples: Arc::new(self.samples.iter().map(|s| s.clamp(-1.0, 1.0)).collect()),
        }
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }
}

/// Sample frames covering `secs` at `sample_rate`, rounded to the nearest frame.
pub(crate) fn frames_for(secs: f64, sample_rate: u32) -> usize {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    (secs * f64::from(sample_rate)).round() as usize
}

#[cfg(test)]
#[path = "../../tests/unit/audio/track.rs"]
mod tests;
