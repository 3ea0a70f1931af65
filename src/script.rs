//! Narration script from an article summary.

use crate::foundation::error::{HerodoError, HerodoResult};

/// Text to be spoken, with the sentences it was built from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Script {
    pub text: String,
    pub sentences: Vec<String>,
}

/// Keep the first `max_sentences` sentences of `summary`.
pub fn generate_script(summary: &str, max_sentences: usize) -> HerodoResult<Script> {
    let sentences: Vec<String> = split_sentences(summary)
        .into_iter()
        .take(max_sentences)
        .collect();
    if sentences.is_empty() {
        return Err(HerodoError::invalid_argument(
            "summary contains no sentences to narrate",
        ));
    }
    let text = sentences.join(" ");
    tracing::info!(sentences = sentences.len(), "generated script");
    Ok(Script { text, sentences })
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split prose into sentences.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace and an upper-case ASCII letter.
/// Every sentence is returned with terminal punctuation. If that finds only one sentence but it
/// contains a `.`, every `.` is treated as a boundary instead.
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = text.chars().collect();

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        current.push(c);
        let boundary = is_terminal(c)
            && chars.get(i + 1) == Some(&' ')
            && chars.get(i + 2).is_some_and(|n| n.is_ascii_uppercase());
        if boundary {
            parts.push(std::mem::take(&mut current));
            i += 2;
        } else {
            i += 1;
        }
    }
    parts.push(current);

    let mut sentences: Vec<String> = parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| {
            if p.ends_with(is_terminal) {
                p.to_string()
            } else {
                format!("{p}.")
            }
        })
        .collect();

    if sentences.len() == 1 && sentences[0].contains('.') {
        sentences = sentences[0]
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("{s}."))
            .collect();
    }
    sentences
}

#[cfg(test)]
#[path = "../tests/unit/script.rs"]
mod tests;
