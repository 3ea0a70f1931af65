use crate::config::ResearchConfig;

/// Words in a file title that mark decorations rather than illustrations.
const EXCLUDED_TITLE_WORDS: [&str; 11] = [
    "icon",
    "logo",
    "flag",
    "svg",
    "button",
    "arrow",
    "symbol",
    "emblem",
    "badge",
    "seal",
    "coat of arms",
];

/// Rejects icons, flags, vector art and thumbnails from an article's file list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageFilter {
    pub min_width: u32,
    pub gif_min_width: u32,
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self {
            min_width: 200,
            gif_min_width: 500,
        }
    }
}

impl ImageFilter {
    pub fn from_config(cfg: &ResearchConfig) -> Self {
        Self {
            min_width: cfg.min_width,
            gif_min_width: cfg.gif_min_width,
        }
    }

    /// Return `true` when the file looks like a photograph or painting worth animating.
    pub fn is_usable_image(&self, url: &str, width: u32, mime: &str, title: &str) -> bool {
        if !mime.starts_with("image/") || width < self.min_width {
            return false;
        }

        let title = title.to_lowercase();
        if EXCLUDED_TITLE_WORDS.iter().any(|w| title.contains(w)) {
            return false;
        }

        let url = url.to_lowercase();
        if url.contains(".svg") {
            return false;
        }
        if url.contains(".gif") {
            return width >= self.gif_min_width;
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/research/filter.rs"]
mod tests;
