use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::foundation::core::Canvas;

/// Fit `src` to the canvas aspect ratio and size.
///
/// Within `tolerance` of the canvas ratio the image is scaled as-is; otherwise the long axis is
/// center-cropped first. Images already at canvas size come back untouched.
pub fn reframe_to_canvas(
    src: &RgbaImage,
    canvas: Canvas,
    tolerance: f64,
    filter: FilterType,
) -> RgbaImage {
    let (w, h) = src.dimensions();
    let target = canvas.aspect();
    let aspect = f64::from(w) / f64::from(h);

    if (aspect - target).abs() < tolerance {
        if (w, h) == (canvas.width, canvas.height) {
            return src.clone();
        }
        return imageops::resize(src, canvas.width, canvas.height, filter);
    }

    let (x, y, cw, ch) = center_crop_box(w, h, target);
    let cropped = imageops::crop_imm(src, x, y, cw, ch).to_image();
    imageops::resize(&cropped, canvas.width, canvas.height, filter)
}

/// Largest centered box of `target` aspect inside a `w`×`h` image.
pub(crate) fn center_crop_box(w: u32, h: u32, target: f64) -> (u32, u32, u32, u32) {
    let aspect = f64::from(w) / f64::from(h);
    if aspect > target {
        let new_w = ((f64::from(h) * target) as u32).clamp(1, w);
        ((w - new_w) / 2, 0, new_w, h)
    } else {
        let new_h = ((f64::from(w) / target) as u32).clamp(1, h);
        (0, (h - new_h) / 2, w, new_h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/reframe.rs"]
mod tests;
