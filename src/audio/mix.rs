use std::path::Path;

use anyhow::Context;

use crate::audio::track::AudioTrack;
use crate::foundation::error::{HerodoError, HerodoResult};

/// Add `overlay` onto `primary`, clamping the sum to `[-1, 1]`.
///
/// The result has the length of `primary`; overlay samples past its end are dropped and a short
/// overlay simply stops contributing.
pub fn mix_tracks(primary: &AudioTrack, overlay: &AudioTrack) -> HerodoResult<AudioTrack> {
    if primary.sample_rate() != overlay.sample_rate() || primary.channels() != overlay.channels() {
        return Err(HerodoError::invalid_argument(format!(
            "cannot mix {} Hz/{} ch with {} Hz/{} ch",
            primary.sample_rate(),
            primary.channels(),
            overlay.sample_rate(),
            overlay.channels()
        )));
    }

    let mut out = primary.samples().to_vec();
    for (dst, src) in out.iter_mut().zip(overlay.samples()) {
        *dst += *src;
    }
    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    AudioTrack::new(primary.sample_rate(), primary.channels(), out)
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub(crate) fn write_f32le(track: &AudioTrack, out_path: &Path) -> HerodoResult<()> {
    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("create audio mix directory '{}'", parent.display())
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(track.samples().len() * 4);
    for &sample in track.samples() {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes)
        .with_context(|| format!("write mixed audio file '{}'", out_path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
