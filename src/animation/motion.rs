//! Pan/zoom motion parameters and their per-frame evaluation.
//!
//! Everything random about a clip is drawn once in [`MotionSpec::resolve`]; the resulting
//! [`ResolvedMotion`] is a plain value and every per-frame query on it is a pure function of
//! normalized progress.

use std::str::FromStr;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::animation::ease::Ease;
use crate::config::MotionConfig;
use crate::foundation::error::{HerodoError, HerodoResult};

/// Direction the virtual camera drifts over the course of a clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
    Center,
    /// One of the five fixed directions, chosen uniformly once per clip.
    Random,
    /// Independent random offset on each axis, drawn once per clip.
    #[serde(alias = "random_diagonal", alias = "random-diagonal")]
    Diagonal,
}

impl PanDirection {
    /// Directions `Random` resolves to.
    pub const FIXED: [PanDirection; 5] = [
        PanDirection::Left,
        PanDirection::Right,
        PanDirection::Up,
        PanDirection::Down,
        PanDirection::Center,
    ];

    /// Return `true` for the five directions that need no random draw.
    pub fn is_fixed(self) -> bool {
        Self::FIXED.contains(&self)
    }
}

impl FromStr for PanDirection {
    type Err = HerodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "center" | "centre" => Ok(Self::Center),
            "random" => Ok(Self::Random),
            "diagonal" | "random-diagonal" | "random_diagonal" => Ok(Self::Diagonal),
            other => Err(HerodoError::invalid_argument(format!(
                "unknown pan direction '{other}'"
            ))),
        }
    }
}

/// Requested zoom range and pan direction for one clip.
///
/// The clip duration travels alongside the spec (see
/// [`ImageAnimator::animate`](crate::ImageAnimator::animate)).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionSpec {
    pub start_zoom: f64,
    pub end_zoom: f64,
    pub pan: PanDirection,
}

impl Default for MotionSpec {
    fn default() -> Self {
        Self {
            start_zoom: 1.0,
            end_zoom: 1.3,
            pan: PanDirection::Random,
        }
    }
}

impl MotionSpec {
    /// Create a validated spec.
    pub fn new(start_zoom: f64, end_zoom: f64, pan: PanDirection) -> HerodoResult<Self> {
        let spec = Self {
            start_zoom,
            end_zoom,
            pan,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check `1.0 <= start_zoom <= end_zoom`.
    pub fn validate(&self) -> HerodoResult<()> {
        if !self.start_zoom.is_finite() || !self.end_zoom.is_finite() {
            return Err(HerodoError::invalid_argument("zoom levels must be finite"));
        }
        if self.start_zoom < 1.0 {
            return Err(HerodoError::invalid_argument(format!(
                "start_zoom must be >= 1.0, got {}",
                self.start_zoom
            )));
        }
        if self.end_zoom < self.start_zoom {
            return Err(HerodoError::invalid_argument(format!(
                "end_zoom ({}) must be >= start_zoom ({})",
                self.end_zoom, self.start_zoom
            )));
        }
        Ok(())
    }

    /// Draw a spec from the configured zoom bounds with a uniformly chosen fixed direction.
    pub fn random<R: Rng + ?Sized>(bounds: &MotionConfig, rng: &mut R) -> Self {
        let start_zoom = sample_half_open(rng, bounds.start_zoom);
        let end_zoom = sample_half_open(rng, bounds.end_zoom).max(start_zoom);
        let pan = *PanDirection::FIXED
            .choose(rng)
            .unwrap_or(&PanDirection::Center);
        Self {
            start_zoom,
            end_zoom,
            pan,
        }
    }

    /// Make every random choice for a `width`×`height` source image.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        width: u32,
        height: u32,
        pan_fraction: f64,
        ease: Ease,
        rng: &mut R,
    ) -> HerodoResult<ResolvedMotion> {
        self.validate()?;
        if width == 0 || height == 0 {
            return Err(HerodoError::invalid_argument(
                "image dimensions must be non-zero",
            ));
        }
        if !pan_fraction.is_finite() || !(0.0..=0.5).contains(&pan_fraction) {
            return Err(HerodoError::invalid_argument(format!(
                "pan fraction must be within [0, 0.5], got {pan_fraction}"
            )));
        }

        let direction = match self.pan {
            PanDirection::Random => *PanDirection::FIXED
                .choose(rng)
                .unwrap_or(&PanDirection::Center),
            other => other,
        };
        let (pan_x, pan_y) = pan_vector(direction, width, height, pan_fraction, rng);

        Ok(ResolvedMotion {
            start_zoom: self.start_zoom,
            end_zoom: self.end_zoom,
            direction,
            pan_x,
            pan_y,
            ease,
        })
    }
}

fn sample_half_open<R: Rng + ?Sized>(rng: &mut R, [lo, hi]: [f64; 2]) -> f64 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

/// Full pan displacement (source pixels) reached at the end of the clip.
fn pan_vector<R: Rng + ?Sized>(
    direction: PanDirection,
    width: u32,
    height: u32,
    fraction: f64,
    rng: &mut R,
) -> (f64, f64) {
    let max_x = f64::from(width) * fraction;
    let max_y = f64::from(height) * fraction;
    match direction {
        PanDirection::Left => (-max_x, 0.0),
        PanDirection::Right => (max_x, 0.0),
        PanDirection::Up => (0.0, -max_y),
        PanDirection::Down => (0.0, max_y),
        PanDirection::Center | PanDirection::Random => (0.0, 0.0),
        PanDirection::Diagonal => {
            let x = if max_x > 0.0 {
                rng.random_range(-max_x..=max_x)
            } else {
                0.0
            };
            let y = if max_y > 0.0 {
                rng.random_range(-max_y..=max_y)
            } else {
                0.0
            };
            (x, y)
        }
    }
}

/// A motion with all random choices made.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ResolvedMotion {
    pub start_zoom: f64,
    pub end_zoom: f64,
    /// Concrete direction (`Random` never appears here).
    pub direction: PanDirection,
    /// Horizontal pan reached at progress 1, in source pixels.
    pub pan_x: f64,
    /// Vertical pan reached at progress 1, in source pixels.
    pub pan_y: f64,
    pub ease: Ease,
}

/// Camera state at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

/// Integer source-pixel rectangle that becomes one output frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ResolvedMotion {
    /// Zoom and pan at normalized progress `p` (clamped to `[0, 1]`).
    pub fn sample(&self, progress: f64) -> MotionSample {
        let eased = self.ease.apply(progress);
        MotionSample {
            zoom: self.start_zoom + (self.end_zoom - self.start_zoom) * eased,
            pan_x: self.pan_x * eased,
            pan_y: self.pan_y * eased,
        }
    }

    /// Source rectangle to extract at progress `p`, or `None` when it degenerates.
    pub fn crop_window(&self, width: u32, height: u32, progress: f64) -> Option<CropWindow> {
        crop_window_for(width, height, self.sample(progress))
    }
}

/// Window of `dim / zoom` pixels per axis centered on image center + pan.
///
/// The window is shifted (not shrunk) to stay inside the image so the output aspect ratio never
/// distorts.
pub(crate) fn crop_window_for(width: u32, height: u32, s: MotionSample) -> Option<CropWindow> {
    if !s.zoom.is_finite() || s.zoom <= 0.0 {
        return None;
    }
    let w = f64::from(width);
    let h = f64::from(height);
    let crop_w = (w / s.zoom).floor().min(w);
    let crop_h = (h / s.zoom).floor().min(h);
    if crop_w < 1.0 || crop_h < 1.0 {
        return None;
    }

    let center_x = w / 2.0 + s.pan_x;
    let center_y = h / 2.0 + s.pan_y;
    let x0 = (center_x - crop_w / 2.0).clamp(0.0, w - crop_w).floor();
    let y0 = (center_y - crop_h / 2.0).clamp(0.0, h - crop_h).floor();
    if !x0.is_finite() || !y0.is_finite() {
        return None;
    }

    Some(CropWindow {
        x: x0 as u32,
        y: y0 as u32,
        width: crop_w as u32,
        height: crop_h as u32,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
