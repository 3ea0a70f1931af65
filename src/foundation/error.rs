use std::fmt;
use std::path::PathBuf;

/// Convenience result alias used across the crate.
pub type HerodoResult<T> = Result<T, HerodoError>;

/// Terminal errors for one render attempt.
#[derive(thiserror::Error, Debug)]
pub enum HerodoError {
    /// Bad caller input: zero images, non-positive duration, inverted zoom range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unreadable or corrupt image/audio data.
    #[error("decode error: {0}")]
    Decode(String),

    /// No source material was supplied at all.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Source material was supplied but none of it survived.
    #[error("no valid clips: {0}")]
    NoValidClips(String),

    /// Final render/mux failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Media duration could not be probed.
    #[error("probe error: {0}")]
    Probe(String),

    /// Reference content could not be fetched.
    #[error("research error: {0}")]
    Research(String),

    /// The speech synthesis collaborator failed.
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HerodoError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn no_valid_clips(msg: impl Into<String>) -> Self {
        Self::NoValidClips(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    pub fn research(msg: impl Into<String>) -> Self {
        Self::Research(msg.into())
    }

    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// A non-fatal fallback taken during a render.
///
/// These never abort the render; they are logged at `warn` and carried on the render job so
/// callers can surface them.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "feature", rename_all = "snake_case")]
pub enum DegradedFeature {
    /// Background music could not be loaded or mixed; output is narration-only.
    BackgroundMusic { path: PathBuf, reason: String },
    /// Narration duration was estimated from the word count instead of probed.
    DurationEstimate { estimated_secs: f64, reason: String },
}

impl fmt::Display for DegradedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackgroundMusic { path, reason } => write!(
                f,
                "background music '{}' dropped: {reason}",
                path.display()
            ),
            Self::DurationEstimate {
                estimated_secs,
                reason,
            } => write!(
                f,
                "narration duration estimated at {estimated_secs:.2}s: {reason}"
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
