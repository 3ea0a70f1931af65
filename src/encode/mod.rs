//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order; a [`crate::RenderJob`] drives one sink per
//! output file.

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
