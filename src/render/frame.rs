use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::foundation::core::Canvas;

/// One rendered frame: straight-alpha RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Opaque black frame.
    pub fn black(canvas: Canvas) -> Self {
        let mut data = vec![0u8; canvas.rgba_len()];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    pub fn from_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Return `self` resized to `canvas` if its dimensions differ.
    pub fn fit_to(self, canvas: Canvas, filter: FilterType) -> Self {
        if self.canvas() == canvas {
            return self;
        }
        let Some(img) = RgbaImage::from_raw(self.width, self.height, self.data) else {
            return Self::black(canvas);
        };
        Self::from_image(imageops::resize(&img, canvas.width, canvas.height, filter))
    }

    /// Return `true` when every pixel is opaque black.
    pub fn is_black(&self) -> bool {
        self.data
            .chunks_exact(4)
            .all(|px| px[0] == 0 && px[1] == 0 && px[2] == 0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
