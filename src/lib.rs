//! Herodo turns a topic name into a short vertical history documentary.
//!
//! The render core is a pipeline of lazy stages:
//!
//! - [`ImageAnimator`] turns one still into a Ken Burns [`KenBurnsClip`]
//! - [`SequenceComposer`] concatenates clips into a [`Sequence`] of a requested length
//! - [`TimelineSynchronizer`] fits the sequence to the narration, mixes background music and
//!   produces a [`RenderJob`]
//! - [`RenderJob::run`] streams frames and PCM into the system `ffmpeg`
//!
//! [`Pipeline`] wires these to Wikipedia research, script extraction and `edge-tts` narration.
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod animation;
pub(crate) mod audio;
pub(crate) mod compose;
pub mod config;
/// Encoding sinks.
pub mod encode;
pub(crate) mod narration;
pub(crate) mod pipeline;
pub(crate) mod render;
pub(crate) mod research;
pub mod script;
pub(crate) mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
pub use crate::foundation::error::{DegradedFeature, HerodoError, HerodoResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::motion::{
    CropWindow, MotionSample, MotionSpec, PanDirection, ResolvedMotion,
};
pub use crate::assets::decode::{ImageAsset, decode_image, load_image};
pub use crate::assets::reframe::reframe_to_canvas;
pub use crate::audio::decode::{AudioDecoder, FfmpegAudioDecoder};
pub use crate::audio::mix::mix_tracks;
pub use crate::audio::probe::{FfprobeProbe, MediaProbe, estimate_speech_duration, resolve_duration};
pub use crate::audio::track::AudioTrack;
pub use crate::compose::sequence::{Sequence, SequenceComposer, SkippedImage};
pub use crate::config::Config;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path, is_ffprobe_on_path};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::narration::tts::{EdgeTtsCommand, Narration, Narrator, SpeechSynthesizer};
pub use crate::pipeline::{Pipeline, PlannedRender, RenderReport};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::ken_burns::{ImageAnimator, KenBurnsClip};
pub use crate::render::pipeline::{
    EncodePlan, RenderStats, RenderThreading, encode_stream, render_frames,
};
pub use crate::render::stream::{FrameStream, Frames};
pub use crate::research::cache::ImageCache;
pub use crate::research::filter::ImageFilter;
pub use crate::research::wikipedia::{
    Article, ArticleSource, ImageCandidate, ResearchBundle, WikipediaClient, WikipediaResearcher,
};
pub use crate::script::{Script, generate_script, split_sentences};
pub use crate::timeline::job::RenderJob;
pub use crate::timeline::sync::{FittedStream, SyncAction, TimelineSynchronizer, plan_sync};
