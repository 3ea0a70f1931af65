use super::*;

struct Fixed(HerodoResult<f64>);

impl MediaProbe for Fixed {
    fn audio_duration(&self, _path: &Path) -> HerodoResult<f64> {
        match &self.0 {
            Ok(v) => Ok(*v),
            Err(e) => Err(HerodoError::probe(e.to_string())),
        }
    }
}

#[test]
fn parses_format_duration() {
    let json = br#"{"format": {"filename": "a.mp3", "duration": "12.480000"}}"#;
    assert!((parse_probe_duration(json).unwrap() - 12.48).abs() < 1e-9);
}

#[test]
fn missing_or_bad_duration_is_a_probe_error() {
    let cases: [&[u8]; 5] = [
        br#"{"format": {}}"#,
        br#"{}"#,
        br#"{"format": {"duration": "N/A"}}"#,
        br#"{"format": {"duration": "0.0"}}"#,
        b"not json",
    ];
    for json in cases {
        assert!(matches!(
            parse_probe_duration(json),
            Err(HerodoError::Probe(_))
        ));
    }
}

#[test]
fn estimate_divides_words_by_rate() {
    let text = "one two three four five";
    assert!((estimate_speech_duration(text, 2.5) - 2.0).abs() < 1e-9);
    assert_eq!(estimate_speech_duration("", 2.5), 0.0);
    assert_eq!(estimate_speech_duration(text, 0.0), 0.0);
}

#[test]
fn probe_success_is_not_degraded() {
    let (secs, degraded) = resolve_duration(&Fixed(Ok(7.5)), Path::new("a.mp3"), "x y", 2.5);
    assert_eq!(secs, 7.5);
    assert!(degraded.is_none());
}

#[test]
fn probe_failure_falls_back_to_estimate() {
    let probe = Fixed(Err(HerodoError::probe("boom")));
    let text = "The quick brown fox jumps over the lazy dog today";
    let (secs, degraded) = resolve_duration(&probe, Path::new("a.mp3"), text, 2.5);
    assert!((secs - 4.0).abs() < 0.5);
    match degraded {
        Some(DegradedFeature::DurationEstimate { estimated_secs, .. }) => {
            assert_eq!(estimated_secs, secs)
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn missing_ffprobe_binary_is_a_probe_error() {
    let err = FfprobeProbe::new("herodo-no-such-ffprobe")
        .audio_duration(Path::new("a.mp3"))
        .unwrap_err();
    assert!(matches!(err, HerodoError::Probe(_)));
}
