use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    assert!(
        FrameRange::new(FrameIndex(3), FrameIndex(3))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn fps_rejects_zero_terms() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(24, 0).is_err());
}

#[test]
fn frames_covering_rounds_up_partial_frames() {
    let fps = Fps::new(24, 1).unwrap();
    assert_eq!(fps.frames_covering(10.0), 240);
    assert_eq!(fps.frames_covering(1.0 / 48.0), 1);
    assert_eq!(fps.frames_covering(0.0), 0);
    assert_eq!(fps.frames_covering(f64::NAN), 0);
    // 10 s expressed through a float sum must not spill into an extra frame.
    let summed: f64 = (0..3).map(|_| 10.0 / 3.0).sum();
    assert_eq!(fps.frames_covering(summed), 240);
}

#[test]
fn frame_time_uses_rational_fps() {
    let fps = Fps::new(30_000, 1001).unwrap();
    let t = fps.frame_time_secs(FrameIndex(30));
    assert!((t - 1.001).abs() < 1e-9);
}

#[test]
fn default_canvas_is_vertical_full_hd() {
    let c = Canvas::default();
    assert_eq!((c.width, c.height), (1080, 1920));
    assert!((c.aspect() - 0.5625).abs() < 1e-12);
    assert_eq!(c.rgba_len(), 1080 * 1920 * 4);
}
