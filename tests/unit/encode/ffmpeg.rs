use super::*;

#[test]
fn flatten_transparent_pixel_returns_bg() {
    let src = vec![200u8, 100, 50, 0];
    let mut dst = vec![0u8; 3];
    flatten_rgba_to_rgb24(&mut dst, &src, [10, 20, 30]).unwrap();
    assert_eq!(dst, vec![10, 20, 30]);
}

#[test]
fn flatten_opaque_pixel_drops_alpha() {
    let src = vec![1u8, 2, 3, 255, 4, 5, 6, 255];
    let mut dst = vec![0u8; 6];
    flatten_rgba_to_rgb24(&mut dst, &src, [10, 20, 30]).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn flatten_half_alpha_blends_straight_colour() {
    let src = vec![255u8, 0, 0, 128];
    let mut dst = vec![0u8; 3];
    flatten_rgba_to_rgb24(&mut dst, &src, [0, 0, 0]).unwrap();
    assert_eq!(dst, vec![128, 0, 0]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 6];
    assert!(flatten_rgba_to_rgb24(&mut dst, &[0u8; 4], [0, 0, 0]).is_err());
}

#[test]
fn opts_follow_encode_config() {
    let mut cfg = EncodeConfig::default();
    cfg.video_codec = "libx265".to_string();
    cfg.overwrite = false;
    let opts = FfmpegSinkOpts::from_config("out/a.mp4", &cfg);
    assert_eq!(opts.video_codec, "libx265");
    assert_eq!(opts.audio_codec, "aac");
    assert_eq!(opts.pixel_format, "yuv420p");
    assert!(!opts.overwrite);
}

#[test]
fn odd_canvas_is_rejected_before_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(dir.path().join("a.mp4")));
    let err = sink
        .begin(SinkConfig {
            width: 17,
            height: 32,
            fps: Fps { num: 24, den: 1 },
            audio: None,
        })
        .unwrap_err();
    assert!(matches!(err, HerodoError::InvalidArgument(_)));
}

#[test]
fn push_before_begin_is_an_encode_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
    };
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &frame),
        Err(HerodoError::Encode(_))
    ));
}

#[test]
fn ensure_parent_dir_creates_nested_directories() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a/b/c.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(dir.path().join("a/b").is_dir());
    ensure_parent_dir(Path::new("bare.mp4")).unwrap();
}
