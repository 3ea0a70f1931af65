//! Run configuration.
//!
//! Every tunable the render core reads is carried in [`Config`] and threaded through the entry
//! points; nothing reads a module-level default at render time. All sections default, so a JSON
//! file only needs the keys it overrides.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::imageops::FilterType;

use crate::animation::ease::Ease;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{HerodoError, HerodoResult};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub video: VideoConfig,
    pub motion: MotionConfig,
    pub sequence: SequenceConfig,
    pub audio: AudioConfig,
    pub encode: EncodeConfig,
    pub narration: NarrationConfig,
    pub research: ResearchConfig,
}

impl Config {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> HerodoResult<Self> {
        let cfg: Config = serde_json::from_reader(r)
            .map_err(|e| HerodoError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> HerodoResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            HerodoError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> HerodoResult<()> {
        let v = &self.video;
        if v.canvas.width == 0 || v.canvas.height == 0 {
            return Err(HerodoError::config("canvas width/height must be non-zero"));
        }
        if !v.canvas.width.is_multiple_of(2) || !v.canvas.height.is_multiple_of(2) {
            return Err(HerodoError::config(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        Fps::new(v.fps.num, v.fps.den).map_err(|e| HerodoError::config(e.to_string()))?;
        if !v.aspect_tolerance.is_finite() || v.aspect_tolerance < 0.0 {
            return Err(HerodoError::config("aspect_tolerance must be >= 0"));
        }

        let m = &self.motion;
        for (name, [lo, hi]) in [("start_zoom", m.start_zoom), ("end_zoom", m.end_zoom)] {
            if !lo.is_finite() || !hi.is_finite() || lo < 1.0 || hi < lo {
                return Err(HerodoError::config(format!(
                    "motion.{name} must be a range [lo, hi] with 1.0 <= lo <= hi"
                )));
            }
        }
        if m.end_zoom[1] < m.start_zoom[0] {
            return Err(HerodoError::config(
                "motion.end_zoom range lies entirely below motion.start_zoom",
            ));
        }
        if !m.pan_fraction.is_finite() || !(0.0..=0.5).contains(&m.pan_fraction) {
            return Err(HerodoError::config("motion.pan_fraction must be within [0, 0.5]"));
        }

        if self.sequence.threads == Some(0) {
            return Err(HerodoError::config("sequence.threads must be >= 1 when set"));
        }

        let a = &self.audio;
        if !a.music_volume.is_finite() || !(0.0..=1.0).contains(&a.music_volume) {
            return Err(HerodoError::config("audio.music_volume must be within [0, 1]"));
        }
        if a.sample_rate == 0 || a.channels == 0 {
            return Err(HerodoError::config(
                "audio.sample_rate and audio.channels must be non-zero",
            ));
        }
        if !a.sync_tolerance_secs.is_finite() || a.sync_tolerance_secs < 0.0 {
            return Err(HerodoError::config("audio.sync_tolerance_secs must be >= 0"));
        }

        let e = &self.encode;
        if e.video_codec.trim().is_empty() || e.audio_codec.trim().is_empty() {
            return Err(HerodoError::config("encode codecs must be non-empty"));
        }

        let n = &self.narration;
        if !n.words_per_second.is_finite() || n.words_per_second <= 0.0 {
            return Err(HerodoError::config("narration.words_per_second must be > 0"));
        }
        if n.max_sentences == 0 {
            return Err(HerodoError::config("narration.max_sentences must be >= 1"));
        }
        Ok(())
    }
}

/// Output geometry and resampling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    pub canvas: Canvas,
    pub fps: Fps,
    /// Absolute width/height ratio difference under which an image is scaled without cropping.
    pub aspect_tolerance: f64,
    pub filter: ResampleFilter,
    pub ease: Ease,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::PORTRAIT_1080P,
            fps: Fps { num: 24, den: 1 },
            aspect_tolerance: 0.01,
            filter: ResampleFilter::Lanczos3,
            ease: Ease::Smoothstep,
        }
    }
}

/// Resampling kernel used for reframing and per-frame scaling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    pub fn to_filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Bounds for the per-image motion draw.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionConfig {
    /// Half-open `[lo, hi)` range for the starting zoom.
    pub start_zoom: [f64; 2],
    /// Half-open `[lo, hi)` range for the final zoom.
    pub end_zoom: [f64; 2],
    /// Maximum pan as a fraction of each image dimension.
    pub pan_fraction: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            start_zoom: [1.0, 1.1],
            end_zoom: [1.2, 1.4],
            pan_fraction: 0.15,
        }
    }
}

/// How the requested total duration is divided between images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    #[default]
    EvenSplit,
}

/// What happens to the time budget of images that fail to load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallPolicy {
    /// Survivors keep `total / requested`; the sequence comes out shorter.
    #[default]
    Preserve,
    /// Survivors split the whole budget between them.
    Redistribute,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SequenceConfig {
    pub allocation: AllocationPolicy,
    pub shortfall: ShortfallPolicy,
    /// Seed for all motion draws; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Prepare images and render frames on a rayon pool.
    pub parallel: bool,
    /// Worker count for the pool (parallel mode only).
    pub threads: Option<usize>,
    /// Frames rendered per parallel batch.
    pub chunk_size: usize,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            allocation: AllocationPolicy::EvenSplit,
            shortfall: ShortfallPolicy::Preserve,
            seed: None,
            parallel: false,
            threads: None,
            chunk_size: 48,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Gain applied to background music before mixing.
    pub music_volume: f32,
    /// Mixing sample rate in Hz.
    pub sample_rate: u32,
    pub channels: u16,
    /// Video/narration durations closer than this are treated as equal.
    pub sync_tolerance_secs: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_volume: 0.1,
            sample_rate: 48_000,
            channels: 2,
            sync_tolerance_secs: 1e-3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeConfig {
    pub video_codec: String,
    pub pixel_format: String,
    pub audio_codec: String,
    pub overwrite: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
            audio_codec: "aac".to_string(),
            overwrite: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NarrationConfig {
    /// Executable invoked for speech synthesis.
    pub tts_program: String,
    pub voice: String,
    /// Assumed speaking rate for the duration estimate fallback.
    pub words_per_second: f64,
    /// Sentences kept from the summary.
    pub max_sentences: usize,
    pub cache_dir: PathBuf,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            tts_program: "edge-tts".to_string(),
            voice: "en-GB-RyanNeural".to_string(),
            words_per_second: 2.5,
            max_sentences: 3,
            cache_dir: PathBuf::from("cache/audio"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResearchConfig {
    pub api_url: String,
    pub cache_dir: PathBuf,
    /// Images narrower than this are dropped.
    pub min_width: u32,
    /// GIFs are only kept at or above this width.
    pub gif_min_width: u32,
    pub api_timeout_secs: u64,
    pub download_timeout_secs: u64,
    pub user_agent: String,
}

impl ResearchConfig {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            cache_dir: PathBuf::from("cache/images"),
            min_width: 200,
            gif_min_width: 500,
            api_timeout_secs: 10,
            download_timeout_secs: 30,
            user_agent: concat!("herodo/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
