use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops::FilterType;

use crate::audio::mix::write_f32le;
use crate::audio::track::AudioTrack;
use crate::config::EncodeConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{DegradedFeature, HerodoResult};
use crate::render::pipeline::{
    EncodePlan, RenderStats, RenderThreading, TempFileGuard, encode_stream, temp_audio_path,
};
use crate::render::stream::FrameStream;
use crate::timeline::sync::SyncAction;

/// One fully assembled encode: synced video, final audio mix and output settings.
///
/// Built by [`crate::TimelineSynchronizer::synchronize`]; nothing is written until
/// [`RenderJob::run`].
pub struct RenderJob {
    pub(crate) video: Arc<dyn FrameStream>,
    pub(crate) audio: AudioTrack,
    pub(crate) output: PathBuf,
    pub(crate) canvas: Canvas,
    pub(crate) fps: Fps,
    pub(crate) filter: FilterType,
    pub(crate) encode: EncodeConfig,
    pub(crate) threading: RenderThreading,
    pub(crate) sync: SyncAction,
    pub(crate) warnings: Vec<DegradedFeature>,
}

impl RenderJob {
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Output length in seconds; equal to the narration length.
    pub fn duration_secs(&self) -> f64 {
        self.video.duration_secs()
    }

    pub fn frame_count(&self) -> u64 {
        self.video.frame_count(self.fps)
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// The synced video stream.
    pub fn video(&self) -> &dyn FrameStream {
        self.video.as_ref()
    }

    /// Final mix: narration plus attenuated music when it loaded.
    pub fn audio(&self) -> &AudioTrack {
        &self.audio
    }

    pub fn sync_action(&self) -> SyncAction {
        self.sync
    }

    pub fn warnings(&self) -> &[DegradedFeature] {
        &self.warnings
    }

    /// Encode to the job's output path with the system `ffmpeg`.
    ///
    /// A failed encode leaves no file at the output path.
    pub fn run(&self) -> HerodoResult<RenderStats> {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::from_config(&self.output, &self.encode));
        self.run_with_sink(&mut sink)
    }

    /// Encode into an arbitrary sink. The PCM temp file is removed on every exit path.
    #[tracing::instrument(skip_all, fields(output = %self.output.display()))]
    pub fn run_with_sink(&self, sink: &mut dyn FrameSink) -> HerodoResult<RenderStats> {
        let pcm_path = temp_audio_path();
        let _pcm_guard = TempFileGuard(Some(pcm_path.clone()));
        write_f32le(&self.audio, &pcm_path)?;

        let plan = EncodePlan {
            canvas: self.canvas,
            fps: self.fps,
            filter: self.filter,
            threading: self.threading.clone(),
            audio: Some(AudioInputConfig {
                path: pcm_path,
                sample_rate: self.audio.sample_rate(),
                channels: self.audio.channels(),
            }),
        };
        tracing::info!(
            frames = self.frame_count(),
            duration = self.duration_secs(),
            "encoding"
        );
        let stats = encode_stream(self.video.as_ref(), &plan, sink)?;
        tracing::info!(frames = stats.frames_total, "encode finished");
        Ok(stats)
    }
}

impl fmt::Debug for RenderJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderJob")
            .field("output", &self.output)
            .field("duration_secs", &self.duration_secs())
            .field("canvas", &self.canvas)
            .field("fps", &self.fps)
            .field("sync", &self.sync)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}
