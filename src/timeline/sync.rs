//! Aligning the video stream to the narration.
//!
//! Narration length is authoritative: the video is looped or cut to match it, never the other way
//! round.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops::FilterType;

use crate::audio::decode::{AudioDecoder, FfmpegAudioDecoder};
use crate::audio::mix::mix_tracks;
use crate::audio::track::AudioTrack;
use crate::config::{AudioConfig, Config, EncodeConfig};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{DegradedFeature, HerodoError, HerodoResult};
use crate::render::frame::FrameRGBA;
use crate::render::pipeline::RenderThreading;
use crate::render::stream::FrameStream;
use crate::timeline::job::RenderJob;

/// What was done to the video to match the narration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction {
    /// Durations already agree.
    Unchanged,
    /// Video was looped `repetitions` times and the excess cut.
    Extend { repetitions: u64 },
    /// Video was cut to the narration length.
    Trim,
}

/// Decide how a `video_secs` stream must change to last `narration_secs`.
pub fn plan_sync(video_secs: f64, narration_secs: f64, tolerance: f64) -> SyncAction {
    if (video_secs - narration_secs).abs() <= tolerance {
        SyncAction::Unchanged
    } else if video_secs < narration_secs {
        SyncAction::Extend {
            repetitions: (narration_secs / video_secs).floor() as u64 + 1,
        }
    } else {
        SyncAction::Trim
    }
}

/// A stream forced to last exactly `duration`.
///
/// When looping, time past the end of the inner stream wraps to its start; otherwise the last
/// inner frame is held.
pub struct FittedStream {
    inner: Arc<dyn FrameStream>,
    duration: f64,
    looping: bool,
}

impl FittedStream {
    pub fn new(inner: Arc<dyn FrameStream>, duration: f64, looping: bool) -> Self {
        Self {
            inner,
            duration,
            looping,
        }
    }

    /// Time in the inner stream shown at output time `t`.
    pub fn inner_time(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, self.duration) };
        let inner = self.inner.duration_secs();
        if t < inner {
            t
        } else if self.looping {
            t.rem_euclid(inner)
        } else {
            inner
        }
    }
}

impl FrameStream for FittedStream {
    fn canvas(&self) -> Canvas {
        self.inner.canvas()
    }

    fn duration_secs(&self) -> f64 {
        self.duration
    }

    fn render_at(&self, t: f64) -> FrameRGBA {
        self.inner.render_at(self.inner_time(t))
    }
}

/// Builds [`RenderJob`]s from a video stream, narration and optional music.
pub struct TimelineSynchronizer {
    audio: AudioConfig,
    canvas: Canvas,
    fps: Fps,
    filter: FilterType,
    encode: EncodeConfig,
    threading: RenderThreading,
    decoder: Arc<dyn AudioDecoder>,
}

impl TimelineSynchronizer {
    pub fn new(cfg: &Config) -> Self {
        Self::with_decoder(cfg, Arc::new(FfmpegAudioDecoder::default()))
    }

    pub fn with_decoder(cfg: &Config, decoder: Arc<dyn AudioDecoder>) -> Self {
        Self {
            audio: cfg.audio.clone(),
            canvas: cfg.video.canvas,
            fps: cfg.video.fps,
            filter: cfg.video.filter.to_filter_type(),
            encode: cfg.encode.clone(),
            threading: RenderThreading::from_config(&cfg.sequence),
            decoder,
        }
    }

    /// Decode a narration file at the mixing format.
    pub fn load_narration(&self, path: &Path) -> HerodoResult<AudioTrack> {
        self.decoder
            .decode(path, self.audio.sample_rate, self.audio.channels)
    }

    /// Align `video` to `narration` and assemble the encode job.
    ///
    /// Background music problems never fail the job: they are logged and recorded as a
    /// [`DegradedFeature::BackgroundMusic`] warning, and the job continues narration-only.
    #[tracing::instrument(skip_all, fields(output = %output.as_ref().display()))]
    pub fn synchronize(
        &self,
        video: Arc<dyn FrameStream>,
        narration: AudioTrack,
        output: impl AsRef<Path>,
        background_music: Option<&Path>,
    ) -> HerodoResult<RenderJob> {
        let video_secs = video.duration_secs();
        if !video_secs.is_finite() || video_secs <= 0.0 {
            return Err(HerodoError::invalid_argument(format!(
                "video stream duration must be > 0, got {video_secs}"
            )));
        }
        if narration.is_empty() {
            return Err(HerodoError::invalid_argument("narration audio is empty"));
        }
        let narration_secs = narration.duration_secs();

        let action = plan_sync(video_secs, narration_secs, self.audio.sync_tolerance_secs);
        match action {
            SyncAction::Unchanged => tracing::info!(video_secs, narration_secs, "durations match"),
            SyncAction::Extend { repetitions } => tracing::info!(
                video_secs,
                narration_secs,
                repetitions,
                "looping video to cover narration"
            ),
            SyncAction::Trim => {
                tracing::info!(video_secs, narration_secs, "trimming video to narration")
            }
        }
        let looping = matches!(action, SyncAction::Extend { .. });
        let video: Arc<dyn FrameStream> =
            Arc::new(FittedStream::new(video, narration_secs, looping));

        let mut warnings = Vec::new();
        let audio = match background_music {
            None => narration,
            Some(path) => match self.mix_music(&narration, path) {
                Ok(mixed) => {
                    tracing::info!(
                        music = %path.display(),
                        volume = self.audio.music_volume,
                        "mixed background music"
                    );
                    mixed
                }
                Err(e) => {
                    tracing::warn!(
                        music = %path.display(),
                        error = %e,
                        "background music failed, continuing with narration only"
                    );
                    warnings.push(DegradedFeature::BackgroundMusic {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    });
                    narration
                }
            },
        };

        Ok(RenderJob {
            video,
            audio,
            output: PathBuf::from(output.as_ref()),
            canvas: self.canvas,
            fps: self.fps,
            filter: self.filter,
            encode: self.encode.clone(),
            threading: self.threading.clone(),
            sync: action,
            warnings,
        })
    }

    fn mix_music(&self, narration: &AudioTrack, path: &Path) -> HerodoResult<AudioTrack> {
        let music = self
            .decoder
            .decode(path, narration.sample_rate(), narration.channels())?;
        if music.is_empty() {
            return Err(HerodoError::decode(format!(
                "'{}' decoded to no samples",
                path.display()
            )));
        }
        let bed = music
            .clamped()
            .fit_to(narration.duration_secs())
            .with_gain(self.audio.music_volume);
        mix_tracks(narration, &bed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/sync.rs"]
mod tests;
