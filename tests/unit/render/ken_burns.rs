use super::*;
use crate::animation::motion::PanDirection;
use crate::config::ResampleFilter;
use image::Rgba;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn animator(width: u32, height: u32) -> ImageAnimator {
    let mut cfg = Config::default();
    cfg.video.canvas = Canvas { width, height };
    cfg.video.filter = ResampleFilter::Triangle;
    ImageAnimator::new(&cfg)
}

fn gradient(width: u32, height: u32) -> ImageAsset {
    ImageAsset::from_rgba(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 255 / width) as u8, (y * 255 / height) as u8, 128, 255])
    }))
    .unwrap()
}

#[test]
fn non_positive_duration_is_rejected() {
    let a = animator(18, 32);
    let img = gradient(18, 32);
    let spec = MotionSpec::default();
    let mut rng = StdRng::seed_from_u64(0);
    for d in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = a.animate(&img, d, &spec, &mut rng).unwrap_err();
        assert!(matches!(err, HerodoError::InvalidArgument(_)), "{d}");
    }
}

#[test]
fn endpoints_reach_start_and_end_state() {
    let a = animator(18, 32);
    let spec = MotionSpec::new(1.05, 1.35, PanDirection::Right).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let clip = a.animate(&gradient(90, 160), 4.0, &spec, &mut rng).unwrap();

    let s0 = clip.sample_at(0.0);
    assert!((s0.zoom - 1.05).abs() < 1e-12);
    assert_eq!((s0.pan_x, s0.pan_y), (0.0, 0.0));

    let s1 = clip.sample_at(4.0);
    assert!((s1.zoom - 1.35).abs() < 1e-12);
    // Pan is measured on the reframed (canvas sized) source.
    assert!((s1.pan_x - 18.0 * 0.15).abs() < 1e-9);
    assert_eq!(s1.pan_y, 0.0);
}

#[test]
fn frames_are_canvas_sized_and_deterministic() {
    let a = animator(18, 32);
    let spec = MotionSpec::new(1.0, 1.3, PanDirection::Diagonal).unwrap();
    let mut rng = StdRng::seed_from_u64(2);
    let clip = a.animate(&gradient(200, 100), 2.0, &spec, &mut rng).unwrap();

    for t in [0.0, 0.5, 1.25, 1.99, 2.0] {
        let f = clip.render_at(t);
        assert_eq!((f.width, f.height), (18, 32));
        assert_eq!(f.data.len(), 18 * 32 * 4);
        assert_eq!(f, clip.render_at(t), "t={t}");
    }
}

#[test]
fn random_direction_is_fixed_for_the_clip_lifetime() {
    let a = animator(18, 32);
    let spec = MotionSpec::new(1.0, 1.3, PanDirection::Random).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let clip = a.animate(&gradient(18, 32), 1.0, &spec, &mut rng).unwrap();
    let direction = clip.motion().direction;
    assert!(direction.is_fixed());
    let clone = clip.clone();
    assert_eq!(clone.motion().direction, direction);
}

#[test]
fn unzoomed_centered_first_frame_is_the_reframed_source() {
    let a = animator(18, 32);
    let src = gradient(18, 32);
    let spec = MotionSpec::new(1.0, 1.4, PanDirection::Center).unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    let clip = a.animate(&src, 1.0, &spec, &mut rng).unwrap();
    let first = clip.render_at(0.0);
    assert_eq!(first.data, src.pixels.as_raw().clone());

    let last = clip.render_at(1.0);
    assert_ne!(last.data, first.data);
}

#[test]
fn collapsed_window_renders_black_instead_of_failing() {
    let a = animator(2, 2);
    let spec = MotionSpec::new(1.0, 10.0, PanDirection::Center).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let clip = a.animate(&gradient(2, 2), 1.0, &spec, &mut rng).unwrap();
    assert!(clip.crop_window_at(1.0).is_none());
    let f = clip.render_at(1.0);
    assert!(f.is_black());
    assert_eq!((f.width, f.height), (2, 2));
}

#[test]
fn animate_path_surfaces_decode_errors() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("corrupt.png");
    std::fs::write(&bad, b"\x89PNG not really").unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    let err = animator(18, 32)
        .animate_path(&bad, 1.0, &MotionSpec::default(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, HerodoError::Decode(_)));
}
