//! Ken Burns animation of a single still image.

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use rand::Rng;

use crate::animation::ease::Ease;
use crate::animation::motion::{CropWindow, MotionSample, MotionSpec, ResolvedMotion};
use crate::assets::decode::{ImageAsset, load_image};
use crate::assets::reframe::reframe_to_canvas;
use crate::config::Config;
use crate::foundation::core::Canvas;
use crate::foundation::error::{HerodoError, HerodoResult};
use crate::render::frame::FrameRGBA;
use crate::render::stream::FrameStream;

/// Turns still images into [`KenBurnsClip`]s for one output geometry.
#[derive(Clone, Debug)]
pub struct ImageAnimator {
    canvas: Canvas,
    aspect_tolerance: f64,
    filter: FilterType,
    pan_fraction: f64,
    ease: Ease,
}

impl ImageAnimator {
    pub fn new(cfg: &Config) -> Self {
        Self {
            canvas: cfg.video.canvas,
            aspect_tolerance: cfg.video.aspect_tolerance,
            filter: cfg.video.filter.to_filter_type(),
            pan_fraction: cfg.motion.pan_fraction,
            ease: cfg.video.ease,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Build a clip of `duration` seconds from an already decoded image.
    ///
    /// `Random`/`Diagonal` pans draw from `rng` here, once; rendering never touches it again.
    pub fn animate<R: Rng + ?Sized>(
        &self,
        image: &ImageAsset,
        duration: f64,
        motion: &MotionSpec,
        rng: &mut R,
    ) -> HerodoResult<KenBurnsClip> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(HerodoError::invalid_argument(format!(
                "clip duration must be > 0, got {duration}"
            )));
        }
        motion.validate()?;

        let source = reframe_to_canvas(
            &image.pixels,
            self.canvas,
            self.aspect_tolerance,
            self.filter,
        );
        let resolved = motion.resolve(
            source.width(),
            source.height(),
            self.pan_fraction,
            self.ease,
            rng,
        )?;
        tracing::debug!(
            direction = ?resolved.direction,
            start_zoom = resolved.start_zoom,
            end_zoom = resolved.end_zoom,
            duration,
            "animating image"
        );

        Ok(KenBurnsClip {
            source: Arc::new(source),
            motion: resolved,
            duration,
            canvas: self.canvas,
            filter: self.filter,
        })
    }

    /// Decode `path` and animate it. Unreadable files fail with a decode error.
    pub fn animate_path<R: Rng + ?Sized>(
        &self,
        path: &Path,
        duration: f64,
        motion: &MotionSpec,
        rng: &mut R,
    ) -> HerodoResult<KenBurnsClip> {
        let image = load_image(path)?;
        self.animate(&image, duration, motion, rng)
    }
}

/// A still image animated with a resolved pan/zoom path.
#[derive(Clone, Debug)]
pub struct KenBurnsClip {
    /// Source reframed to the canvas aspect ratio.
    source: Arc<RgbaImage>,
    motion: ResolvedMotion,
    duration: f64,
    canvas: Canvas,
    filter: FilterType,
}

impl KenBurnsClip {
    pub fn motion(&self) -> &ResolvedMotion {
        &self.motion
    }

    /// Same motion path stretched over a new length.
    pub(crate) fn retimed(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    fn progress(&self, t: f64) -> f64 {
        let p = t / self.duration;
        if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
    }

    /// Camera state at `t` seconds.
    pub fn sample_at(&self, t: f64) -> MotionSample {
        self.motion.sample(self.progress(t))
    }

    /// Source rectangle shown at `t` seconds.
    pub fn crop_window_at(&self, t: f64) -> Option<CropWindow> {
        self.motion
            .crop_window(self.source.width(), self.source.height(), self.progress(t))
    }
}

impl FrameStream for KenBurnsClip {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn duration_secs(&self) -> f64 {
        self.duration
    }

    fn render_at(&self, t: f64) -> FrameRGBA {
        let Some(win) = self.crop_window_at(t) else {
            return FrameRGBA::black(self.canvas);
        };
        let (sw, sh) = self.source.dimensions();
        let full_frame = (win.width, win.height) == (sw, sh);
        if full_frame && (sw, sh) == (self.canvas.width, self.canvas.height) {
            return FrameRGBA::from_image((*self.source).clone());
        }

        let window =
            imageops::crop_imm(&*self.source, win.x, win.y, win.width, win.height).to_image();
        FrameRGBA::from_image(imageops::resize(
            &window,
            self.canvas.width,
            self.canvas.height,
            self.filter,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/ken_burns.rs"]
mod tests;
