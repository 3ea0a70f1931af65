use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{ImageReader, RgbaImage};

use crate::foundation::error::{HerodoError, HerodoResult};

/// A decoded still image, straight-alpha RGBA8.
#[derive(Clone, Debug)]
pub struct ImageAsset {
    /// Where the pixels came from, when loaded from disk.
    pub source: Option<PathBuf>,
    pub pixels: Arc<RgbaImage>,
}

impl ImageAsset {
    /// Wrap an in-memory image.
    pub fn from_rgba(pixels: RgbaImage) -> HerodoResult<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(HerodoError::decode("image has zero width or height"));
        }
        Ok(Self {
            source: None,
            pixels: Arc::new(pixels),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width()) / f64::from(self.height())
    }
}

/// Decode an image file, sniffing the format from its contents.
pub fn load_image(path: &Path) -> HerodoResult<ImageAsset> {
    let reader = ImageReader::open(path)
        .map_err(|e| HerodoError::decode(format!("open image '{}': {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| HerodoError::decode(format!("sniff image '{}': {e}", path.display())))?;
    let dyn_img = reader
        .decode()
        .map_err(|e| HerodoError::decode(format!("decode image '{}': {e}", path.display())))?;

    let mut asset = ImageAsset::from_rgba(dyn_img.to_rgba8())
        .map_err(|e| HerodoError::decode(format!("'{}': {e}", path.display())))?;
    asset.source = Some(path.to_path_buf());
    Ok(asset)
}

/// Decode an encoded image held in memory.
pub fn decode_image(bytes: &[u8]) -> HerodoResult<ImageAsset> {
    let dyn_img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| HerodoError::decode(format!("sniff image bytes: {e}")))?
        .decode()
        .map_err(|e| HerodoError::decode(format!("decode image from memory: {e}")))?;
    ImageAsset::from_rgba(dyn_img.to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
