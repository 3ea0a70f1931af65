//! Speech synthesis for the narration track.

pub(crate) mod tts;
