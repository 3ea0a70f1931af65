use std::path::PathBuf;

use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::HerodoResult;
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] at the start of an encode.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Optional raw PCM audio file to mux alongside the frames.
    pub audio: Option<AudioInputConfig>,
}

impl SinkConfig {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

/// Raw PCM audio input for sinks that encode audio.
#[derive(Debug, Clone)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// `push_frame` is called in strictly increasing `FrameIndex` order. After a failure the driver
/// calls `abort` instead of `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> HerodoResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> HerodoResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> HerodoResult<()>;
    /// Release resources after a failed render and discard partial output.
    fn abort(&mut self) {}
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    /// Frames in timeline order.
    pub(crate) frames: Vec<(FrameIndex, FrameRGBA)>,
    /// PCM read back from the audio input at `end`.
    audio: Option<Vec<u8>>,
    finished: bool,
    aborted: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Raw `f32le` bytes of the audio input, captured at `end` before the file is removed.
    pub fn audio_bytes(&self) -> Option<&[u8]> {
        self.audio.as_deref()
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> HerodoResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.audio = None;
        self.finished = false;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> HerodoResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> HerodoResult<()> {
        if let Some(audio) = self.cfg.as_ref().and_then(|c| c.audio.as_ref()) {
            use anyhow::Context as _;
            let bytes = std::fs::read(&audio.path)
                .with_context(|| format!("read audio input '{}'", audio.path.display()))?;
            self.audio = Some(bytes);
        }
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}
