//! Driving a [`FrameStream`] into a [`FrameSink`].
//!
//! Frames are rendered in chunks. In parallel mode each chunk is rendered on a rayon pool and
//! then pushed to the sink in index order, so memory stays bounded by one chunk.

use image::imageops::FilterType;
use rayon::prelude::*;

use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{HerodoError, HerodoResult};
use crate::foundation::threads::build_thread_pool;
use crate::render::frame::FrameRGBA;
use crate::render::stream::FrameStream;

/// Threading and chunking controls for multi-frame rendering.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Enable parallel rendering when `true`.
    pub parallel: bool,
    /// Chunk size in frames for batched scheduling.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 48,
            threads: None,
        }
    }
}

impl RenderThreading {
    pub fn from_config(cfg: &crate::config::SequenceConfig) -> Self {
        Self {
            parallel: cfg.parallel,
            chunk_size: cfg.chunk_size,
            threads: cfg.threads,
        }
    }
}

/// Aggregated rendering counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Frames that came out at the wrong size and were resized to the canvas.
    pub frames_resized: u64,
}

/// Everything [`encode_stream`] needs besides the stream and the sink.
#[derive(Clone, Debug)]
pub struct EncodePlan {
    pub canvas: Canvas,
    pub fps: Fps,
    pub filter: FilterType,
    pub threading: RenderThreading,
    pub audio: Option<AudioInputConfig>,
}

/// Render every frame of `stream` at `plan.fps` and feed them to `sink`.
///
/// Frames whose size differs from `plan.canvas` are resized. On any error the sink is aborted
/// before the error is returned.
pub fn encode_stream(
    stream: &dyn FrameStream,
    plan: &EncodePlan,
    sink: &mut dyn FrameSink,
) -> HerodoResult<RenderStats> {
    let total = stream.frame_count(plan.fps);
    if total == 0 {
        return Err(HerodoError::invalid_argument(
            "stream is too short to produce a frame",
        ));
    }

    sink.begin(SinkConfig {
        width: plan.canvas.width,
        height: plan.canvas.height,
        fps: plan.fps,
        audio: plan.audio.clone(),
    })?;

    match push_all(stream, plan, total, sink).and_then(|stats| sink.end().map(|()| stats)) {
        Ok(stats) => Ok(stats),
        Err(e) => {
            sink.abort();
            Err(e)
        }
    }
}

fn push_all(
    stream: &dyn FrameStream,
    plan: &EncodePlan,
    total: u64,
    sink: &mut dyn FrameSink,
) -> HerodoResult<RenderStats> {
    let mut stats = RenderStats::default();
    let chunk_size = normalized_chunk_size(plan.threading.chunk_size);
    let pool = if plan.threading.parallel {
        Some(build_thread_pool(plan.threading.threads)?)
    } else {
        None
    };

    let mut chunk_start = 0;
    while chunk_start < total {
        let chunk_end = (chunk_start + chunk_size).min(total);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;

        let frames = match pool.as_ref() {
            Some(pool) => render_chunk_parallel(stream, chunk, plan.fps, pool),
            None => render_chunk_sequential(stream, chunk, plan.fps),
        };

        for (offset, frame) in frames.into_iter().enumerate() {
            let idx = FrameIndex(chunk.start.0 + offset as u64);
            let frame = if frame.canvas() == plan.canvas {
                frame
            } else {
                if stats.frames_resized == 0 {
                    tracing::warn!(
                        got = ?frame.canvas(),
                        expected = ?plan.canvas,
                        frame = idx.0,
                        "frame size mismatch, resizing to canvas"
                    );
                }
                stats.frames_resized += 1;
                frame.fit_to(plan.canvas, plan.filter)
            };
            sink.push_frame(idx, &frame)?;
            stats.frames_total += 1;
        }
        chunk_start = chunk_end;
    }

    tracing::debug!(frames = stats.frames_total, "pushed all frames");
    Ok(stats)
}

/// Render a frame range into memory.
pub fn render_frames(
    stream: &dyn FrameStream,
    range: FrameRange,
    fps: Fps,
    threading: &RenderThreading,
) -> HerodoResult<Vec<FrameRGBA>> {
    if !threading.parallel {
        return Ok(render_chunk_sequential(stream, range, fps));
    }
    let pool = build_thread_pool(threading.threads)?;
    Ok(render_chunk_parallel(stream, range, fps, &pool))
}

fn render_chunk_sequential(stream: &dyn FrameStream, range: FrameRange, fps: Fps) -> Vec<FrameRGBA> {
    (range.start.0..range.end.0)
        .map(|f| stream.render_at(fps.frame_time_secs(FrameIndex(f))))
        .collect()
}

fn render_chunk_parallel(
    stream: &dyn FrameStream,
    range: FrameRange,
    fps: Fps,
    pool: &rayon::ThreadPool,
) -> Vec<FrameRGBA> {
    pool.install(|| {
        (range.start.0..range.end.0)
            .into_par_iter()
            .map(|f| stream.render_at(fps.frame_time_secs(FrameIndex(f))))
            .collect()
    })
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

/// Deletes the wrapped file on drop.
pub(crate) struct TempFileGuard(pub(crate) Option<std::path::PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// A fresh path in the system temp directory for intermediate audio.
pub(crate) fn temp_audio_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "herodo_audio_mix_{}_{}.f32le",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
