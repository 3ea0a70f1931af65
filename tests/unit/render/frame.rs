use super::*;

#[test]
fn black_frame_is_opaque_and_canvas_sized() {
    let f = FrameRGBA::black(Canvas {
        width: 4,
        height: 2,
    });
    assert_eq!(f.data.len(), 4 * 2 * 4);
    assert!(f.is_black());
    assert!(f.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn fit_to_is_identity_for_matching_size() {
    let img = RgbaImage::from_pixel(4, 6, image::Rgba([9, 8, 7, 255]));
    let f = FrameRGBA::from_image(img);
    let before = f.clone();
    let after = f.fit_to(
        Canvas {
            width: 4,
            height: 6,
        },
        FilterType::Lanczos3,
    );
    assert_eq!(before, after);
}

#[test]
fn fit_to_resizes_mismatched_frames() {
    let img = RgbaImage::from_pixel(10, 10, image::Rgba([200, 0, 0, 255]));
    let f = FrameRGBA::from_image(img).fit_to(
        Canvas {
            width: 4,
            height: 8,
        },
        FilterType::Triangle,
    );
    assert_eq!((f.width, f.height), (4, 8));
    assert_eq!(f.data.len(), 4 * 8 * 4);
    assert!(!f.is_black());
}
