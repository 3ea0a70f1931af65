//! Lazy, time-indexed frame sources.
//!
//! A [`FrameStream`] has no cursor: `render_at(t)` is a pure function of `t`, so a stream can be
//! walked any number of times by building a new [`Frames`] iterator over it.

use std::sync::Arc;

use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::render::frame::FrameRGBA;

/// A finite sequence of canvas-sized frames indexed by continuous time.
pub trait FrameStream: Send + Sync {
    /// Size of every frame this stream produces.
    fn canvas(&self) -> Canvas;

    /// Length of the stream in seconds.
    fn duration_secs(&self) -> f64;

    /// Render the frame visible at `t` seconds.
    ///
    /// `t` outside `[0, duration)` is clamped. Two calls with the same `t` return identical
    /// pixels.
    fn render_at(&self, t: f64) -> FrameRGBA;

    /// Frames needed at `fps` to cover the whole duration.
    fn frame_count(&self, fps: Fps) -> u64 {
        fps.frames_covering(self.duration_secs())
    }
}

impl<S: FrameStream + ?Sized> FrameStream for Arc<S> {
    fn canvas(&self) -> Canvas {
        (**self).canvas()
    }

    fn duration_secs(&self) -> f64 {
        (**self).duration_secs()
    }

    fn render_at(&self, t: f64) -> FrameRGBA {
        (**self).render_at(t)
    }
}

impl<S: FrameStream + ?Sized> FrameStream for Box<S> {
    fn canvas(&self) -> Canvas {
        (**self).canvas()
    }

    fn duration_secs(&self) -> f64 {
        (**self).duration_secs()
    }

    fn render_at(&self, t: f64) -> FrameRGBA {
        (**self).render_at(t)
    }
}

/// One pass over a stream at a fixed frame rate.
pub struct Frames<'a> {
    stream: &'a dyn FrameStream,
    fps: Fps,
    next: u64,
    end: u64,
}

impl<'a> Frames<'a> {
    pub fn new(stream: &'a dyn FrameStream, fps: Fps) -> Self {
        Self {
            stream,
            fps,
            next: 0,
            end: stream.frame_count(fps),
        }
    }
}

impl Iterator for Frames<'_> {
    type Item = (FrameIndex, FrameRGBA);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let idx = FrameIndex(self.next);
        self.next += 1;
        Some((idx, self.stream.render_at(self.fps.frame_time_secs(idx))))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.end - self.next) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Frames<'_> {}

#[cfg(test)]
#[path = "../../tests/unit/render/stream.rs"]
mod tests;
