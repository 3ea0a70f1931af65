use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use anyhow::Context as _;

use crate::audio::probe::{FfprobeProbe, MediaProbe, resolve_duration};
use crate::config::{Config, NarrationConfig};
use crate::foundation::digest::sha256_hex;
use crate::foundation::error::{DegradedFeature, HerodoError, HerodoResult};

/// Renders text to an audio file.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(&self, text: &str, voice: &str, out: &Path) -> HerodoResult<()>;
}

/// Runs the `edge-tts` command line tool.
#[derive(Clone, Debug)]
pub struct EdgeTtsCommand {
    program: String,
}

impl EdgeTtsCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for EdgeTtsCommand {
    fn default() -> Self {
        Self::new("edge-tts")
    }
}

impl SpeechSynthesizer for EdgeTtsCommand {
    fn synthesize(&self, text: &str, voice: &str, out: &Path) -> HerodoResult<()> {
        let output = Command::new(&self.program)
            .args(["--voice", voice, "--text", text, "--write-media"])
            .arg(out)
            .output()
            .map_err(|e| {
                HerodoError::synthesis(format!("failed to run '{}': {e}", self.program))
            })?;
        if !output.status.success() {
            return Err(HerodoError::synthesis(format!(
                "'{}' exited with status {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// A synthesized narration file and how long it plays.
#[derive(Clone, Debug, PartialEq)]
pub struct Narration {
    pub path: PathBuf,
    pub duration_secs: f64,
    /// Served from the cache without running the synthesizer.
    pub cached: bool,
    /// Set when the duration is a word-count estimate.
    pub warning: Option<DegradedFeature>,
}

/// Synthesizes, caches and measures narration audio.
pub struct Narrator {
    cfg: NarrationConfig,
    synth: Arc<dyn SpeechSynthesizer>,
    probe: Arc<dyn MediaProbe>,
}

impl Narrator {
    pub fn new(cfg: &Config) -> Self {
        Self::with_backends(
            cfg,
            Arc::new(EdgeTtsCommand::new(cfg.narration.tts_program.clone())),
            Arc::new(FfprobeProbe::default()),
        )
    }

    pub fn with_backends(
        cfg: &Config,
        synth: Arc<dyn SpeechSynthesizer>,
        probe: Arc<dyn MediaProbe>,
    ) -> Self {
        Self {
            cfg: cfg.narration.clone(),
            synth,
            probe,
        }
    }

    /// Cache location for `text` spoken with the configured voice.
    pub fn cache_path(&self, text: &str) -> PathBuf {
        let key = format!("{}\n{}", self.cfg.voice, text);
        self.cfg
            .cache_dir
            .join(format!("{}.mp3", sha256_hex(key.as_bytes())))
    }

    /// Speak `text`, reusing a cached rendering when one exists.
    pub fn narrate(&self, text: &str) -> HerodoResult<Narration> {
        if text.trim().is_empty() {
            return Err(HerodoError::invalid_argument("narration text is empty"));
        }

        let path = self.cache_path(text);
        let cached = is_non_empty_file(&path);
        if cached {
            tracing::info!(path = %path.display(), "reusing cached narration");
        } else {
            std::fs::create_dir_all(&self.cfg.cache_dir).with_context(|| {
                format!("create audio cache '{}'", self.cfg.cache_dir.display())
            })?;
            tracing::info!(voice = %self.cfg.voice, "generating narration");
            if let Err(e) = self.synth.synthesize(text, &self.cfg.voice, &path) {
                let _ = std::fs::remove_file(&path);
                return Err(e);
            }
            if !is_non_empty_file(&path) {
                let _ = std::fs::remove_file(&path);
                return Err(HerodoError::synthesis(format!(
                    "synthesizer produced no audio at '{}'",
                    path.display()
                )));
            }
        }

        let (duration_secs, warning) = resolve_duration(
            self.probe.as_ref(),
            &path,
            text,
            self.cfg.words_per_second,
        );
        tracing::info!(path = %path.display(), duration = duration_secs, "narration ready");
        Ok(Narration {
            path,
            duration_secs,
            cached,
            warning,
        })
    }
}

fn is_non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}

#[cfg(test)]
#[path = "../../tests/unit/narration/tts.rs"]
mod tests;
