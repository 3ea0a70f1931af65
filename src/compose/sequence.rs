//! Joining many animated images into one continuous sequence.
//!
//! Motion parameters are drawn up front, in input order, from the caller's generator. Each image
//! then gets its own seeded generator, so the result is identical whether images are prepared
//! sequentially or on the rayon pool.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::animation::motion::MotionSpec;
use crate::config::{AllocationPolicy, Config, MotionConfig, ShortfallPolicy};
use crate::foundation::core::Canvas;
use crate::foundation::error::{HerodoError, HerodoResult};
use crate::foundation::threads::build_thread_pool;
use crate::render::frame::FrameRGBA;
use crate::render::ken_burns::{ImageAnimator, KenBurnsClip};
use crate::render::stream::FrameStream;

/// An input image that could not be turned into a clip.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: String,
}

/// Builds a [`Sequence`] from image paths and a total duration.
#[derive(Clone, Debug)]
pub struct SequenceComposer {
    animator: ImageAnimator,
    motion: MotionConfig,
    allocation: AllocationPolicy,
    shortfall: ShortfallPolicy,
    parallel: bool,
    threads: Option<usize>,
}

impl SequenceComposer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            animator: ImageAnimator::new(cfg),
            motion: cfg.motion.clone(),
            allocation: cfg.sequence.allocation,
            shortfall: cfg.sequence.shortfall,
            parallel: cfg.sequence.parallel,
            threads: cfg.sequence.threads,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.animator.canvas()
    }

    /// Animate every image in `images` and concatenate the clips in input order.
    ///
    /// Images that fail to decode are logged and skipped. With the default
    /// [`ShortfallPolicy::Preserve`] every survivor keeps `total / images.len()` seconds, so the
    /// sequence is shorter than requested when anything is skipped.
    #[tracing::instrument(skip_all, fields(images = images.len(), total_duration = total_duration))]
    pub fn compose<P, R>(
        &self,
        images: &[P],
        total_duration: f64,
        rng: &mut R,
    ) -> HerodoResult<Sequence>
    where
        P: AsRef<Path> + Sync,
        R: Rng + ?Sized,
    {
        if images.is_empty() {
            return Err(HerodoError::empty_input("no images supplied"));
        }
        if !total_duration.is_finite() || total_duration <= 0.0 {
            return Err(HerodoError::invalid_argument(format!(
                "total duration must be > 0, got {total_duration}"
            )));
        }

        let per_image = match self.allocation {
            AllocationPolicy::EvenSplit => total_duration / images.len() as f64,
        };
        let mut draws: Vec<(MotionSpec, u64)> = Vec::with_capacity(images.len());
        for _ in images {
            let spec = MotionSpec::random(&self.motion, &mut *rng);
            draws.push((spec, rng.random::<u64>()));
        }

        let prepare = |(i, (path, (spec, seed))): (usize, (&P, &(MotionSpec, u64)))| {
            let path = path.as_ref();
            let mut clip_rng = StdRng::seed_from_u64(*seed);
            let out = self
                .animator
                .animate_path(path, per_image, spec, &mut clip_rng);
            match &out {
                Ok(_) => tracing::info!(
                    index = i + 1,
                    total = images.len(),
                    image = %path.display(),
                    "created clip"
                ),
                Err(e) => tracing::warn!(
                    image = %path.display(),
                    error = %e,
                    "skipping image"
                ),
            }
            (path.to_path_buf(), out)
        };

        let prepared: Vec<(PathBuf, HerodoResult<KenBurnsClip>)> = if self.parallel {
            let pool = build_thread_pool(self.threads)?;
            pool.install(|| {
                images
                    .par_iter()
                    .zip(draws.par_iter())
                    .enumerate()
                    .map(prepare)
                    .collect()
            })
        } else {
            images
                .iter()
                .zip(draws.iter())
                .enumerate()
                .map(prepare)
                .collect()
        };

        let mut clips = Vec::with_capacity(prepared.len());
        let mut skipped = Vec::new();
        for (path, out) in prepared {
            match out {
                Ok(clip) => clips.push(clip),
                Err(e) => skipped.push(SkippedImage {
                    path,
                    reason: e.to_string(),
                }),
            }
        }

        if clips.is_empty() {
            return Err(HerodoError::no_valid_clips(format!(
                "all {} images failed to load",
                images.len()
            )));
        }

        if !skipped.is_empty() && self.shortfall == ShortfallPolicy::Redistribute {
            let share = total_duration / clips.len() as f64;
            clips = clips.into_iter().map(|c| c.retimed(share)).collect();
        }

        Ok(Sequence::from_parts(
            clips,
            self.canvas(),
            images.len(),
            skipped,
        ))
    }
}

/// Clips played back to back with hard cuts.
#[derive(Clone, Debug)]
pub struct Sequence {
    clips: Vec<KenBurnsClip>,
    /// Start time of each clip; `starts[0] == 0`.
    starts: Vec<f64>,
    duration: f64,
    canvas: Canvas,
    requested: usize,
    skipped: Vec<SkippedImage>,
}

impl Sequence {
    fn from_parts(
        clips: Vec<KenBurnsClip>,
        canvas: Canvas,
        requested: usize,
        skipped: Vec<SkippedImage>,
    ) -> Self {
        let mut starts = Vec::with_capacity(clips.len());
        let mut acc = 0.0;
        for c in &clips {
            starts.push(acc);
            acc += c.duration_secs();
        }
        Self {
            clips,
            starts,
            duration: acc,
            canvas,
            requested,
            skipped,
        }
    }

    pub fn clips(&self) -> &[KenBurnsClip] {
        &self.clips
    }

    pub fn clip_durations(&self) -> Vec<f64> {
        self.clips.iter().map(|c| c.duration_secs()).collect()
    }

    /// Number of images the sequence was asked to contain.
    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn skipped(&self) -> &[SkippedImage] {
        &self.skipped
    }

    /// Index of the clip visible at `t` together with the clip-local time.
    fn locate(&self, t: f64) -> (usize, f64) {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, self.duration) };
        let idx = self.starts.partition_point(|&s| s <= t).saturating_sub(1);
        (idx, t - self.starts[idx])
    }
}

impl FrameStream for Sequence {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn duration_secs(&self) -> f64 {
        self.duration
    }

    fn render_at(&self, t: f64) -> FrameRGBA {
        let (idx, local) = self.locate(t);
        self.clips[idx].render_at(local)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/sequence.rs"]
mod tests;
