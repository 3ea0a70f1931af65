use super::*;

#[test]
fn defaults_match_vertical_documentary_format() {
    let cfg = Config::default();
    assert_eq!(cfg.video.canvas, Canvas::PORTRAIT_1080P);
    assert_eq!(cfg.video.fps, Fps { num: 24, den: 1 });
    assert_eq!(cfg.motion.pan_fraction, 0.15);
    assert_eq!(cfg.motion.start_zoom, [1.0, 1.1]);
    assert_eq!(cfg.motion.end_zoom, [1.2, 1.4]);
    assert_eq!(cfg.audio.music_volume, 0.1);
    assert_eq!(cfg.sequence.allocation, AllocationPolicy::EvenSplit);
    assert_eq!(cfg.sequence.shortfall, ShortfallPolicy::Preserve);
    assert_eq!(cfg.encode.video_codec, "libx264");
    assert_eq!(cfg.encode.audio_codec, "aac");
    cfg.validate().unwrap();
}

#[test]
fn partial_json_overrides_only_named_keys() {
    let json = r#"{
        "video": { "canvas": { "width": 720, "height": 1280 }, "filter": "triangle" },
        "audio": { "music_volume": 0.2 },
        "sequence": { "seed": 7, "shortfall": "redistribute" }
    }"#;
    let cfg = Config::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.video.canvas.width, 720);
    assert_eq!(cfg.video.fps.num, 24);
    assert_eq!(cfg.video.filter, ResampleFilter::Triangle);
    assert_eq!(cfg.audio.music_volume, 0.2);
    assert_eq!(cfg.audio.sample_rate, 48_000);
    assert_eq!(cfg.sequence.seed, Some(7));
    assert_eq!(cfg.sequence.shortfall, ShortfallPolicy::Redistribute);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = Config::from_reader(r#"{ "vidoe": {} }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, HerodoError::Config(_)));
}

#[test]
fn validate_rejects_inconsistent_values() {
    let mut cfg = Config::default();
    cfg.video.canvas.width = 1081;
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.motion.start_zoom = [0.9, 1.0];
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.motion.end_zoom = [1.4, 1.2];
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.audio.music_volume = 1.5;
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.sequence.threads = Some(0);
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.narration.words_per_second = 0.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn from_path_reports_missing_file() {
    let err = Config::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("open config JSON"));
}

#[test]
fn filter_maps_to_image_filter_type() {
    assert_eq!(
        ResampleFilter::Lanczos3.to_filter_type(),
        FilterType::Lanczos3
    );
    assert_eq!(
        ResampleFilter::Nearest.to_filter_type(),
        FilterType::Nearest
    );
}
