use super::*;

#[test]
fn display_prefixes_are_stable() {
    let cases = [
        (HerodoError::invalid_argument("x"), "invalid argument:"),
        (HerodoError::decode("x"), "decode error:"),
        (HerodoError::empty_input("x"), "empty input:"),
        (HerodoError::no_valid_clips("x"), "no valid clips:"),
        (HerodoError::encode("x"), "encode error:"),
        (HerodoError::probe("x"), "probe error:"),
        (HerodoError::research("x"), "research error:"),
        (HerodoError::synthesis("x"), "synthesis error:"),
        (HerodoError::config("x"), "config error:"),
    ];
    for (err, prefix) in cases {
        assert!(err.to_string().starts_with(prefix), "{err}");
    }
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = HerodoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn degraded_feature_display_names_the_fallback() {
    let music = DegradedFeature::BackgroundMusic {
        path: PathBuf::from("music.mp3"),
        reason: "no audio stream".to_string(),
    };
    assert!(music.to_string().contains("music.mp3"));
    assert!(music.to_string().contains("no audio stream"));

    let estimate = DegradedFeature::DurationEstimate {
        estimated_secs: 4.0,
        reason: "ffprobe missing".to_string(),
    };
    assert!(estimate.to_string().contains("4.00s"));
}
