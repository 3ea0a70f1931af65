use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

#[derive(Default)]
struct FakeSynth {
    calls: AtomicUsize,
    write: bool,
}

impl SpeechSynthesizer for FakeSynth {
    fn synthesize(&self, _text: &str, _voice: &str, out: &Path) -> HerodoResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.write {
            std::fs::write(out, b"ID3 fake mp3").unwrap();
        }
        Ok(())
    }
}

struct FixedProbe(Option<f64>);

impl MediaProbe for FixedProbe {
    fn audio_duration(&self, _path: &Path) -> HerodoResult<f64> {
        self.0.ok_or_else(|| HerodoError::probe("unreadable"))
    }
}

fn config(dir: &Path) -> Config {
    let mut cfg = Config::default();
    cfg.narration.cache_dir = dir.join("audio");
    cfg
}

#[test]
fn synthesizes_once_then_serves_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let synth = Arc::new(FakeSynth {
        write: true,
        ..FakeSynth::default()
    });
    let narrator = Narrator::with_backends(
        &config(dir.path()),
        synth.clone(),
        Arc::new(FixedProbe(Some(6.25))),
    );

    let first = narrator.narrate("Rome was not built in a day.").unwrap();
    assert!(!first.cached);
    assert_eq!(first.duration_secs, 6.25);
    assert!(first.warning.is_none());
    assert!(first.path.starts_with(dir.path().join("audio")));

    let second = narrator.narrate("Rome was not built in a day.").unwrap();
    assert!(second.cached);
    assert_eq!(second.path, first.path);
    assert_eq!(synth.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn cache_key_depends_on_voice_and_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path());
    let synth: Arc<dyn SpeechSynthesizer> = Arc::new(FakeSynth::default());
    let probe: Arc<dyn MediaProbe> = Arc::new(FixedProbe(None));
    let a = Narrator::with_backends(&cfg, synth.clone(), probe.clone()).cache_path("hello");
    cfg.narration.voice = "en-US-GuyNeural".to_string();
    let b = Narrator::with_backends(&cfg, synth.clone(), probe.clone()).cache_path("hello");
    let c = Narrator::with_backends(&cfg, synth, probe).cache_path("hello!");
    assert_ne!(a, b);
    assert_ne!(b, c);
    assert_eq!(a.extension().unwrap(), "mp3");
}

#[test]
fn probe_failure_estimates_from_word_count() {
    let dir = tempfile::tempdir().unwrap();
    let narrator = Narrator::with_backends(
        &config(dir.path()),
        Arc::new(FakeSynth {
            write: true,
            ..FakeSynth::default()
        }),
        Arc::new(FixedProbe(None)),
    );
    let n = narrator.narrate("one two three four five six seven eight nine ten").unwrap();
    assert!((n.duration_secs - 4.0).abs() < 1e-9);
    assert!(matches!(
        n.warning,
        Some(DegradedFeature::DurationEstimate { .. })
    ));
}

#[test]
fn synthesizer_that_writes_nothing_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let narrator = Narrator::with_backends(
        &config(dir.path()),
        Arc::new(FakeSynth::default()),
        Arc::new(FixedProbe(Some(1.0))),
    );
    let err = narrator.narrate("Silence.").unwrap_err();
    assert!(matches!(err, HerodoError::Synthesis(_)));
}

#[test]
fn empty_text_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let narrator = Narrator::with_backends(
        &config(dir.path()),
        Arc::new(FakeSynth::default()),
        Arc::new(FixedProbe(Some(1.0))),
    );
    assert!(matches!(
        narrator.narrate("  "),
        Err(HerodoError::InvalidArgument(_))
    ));
}

#[test]
fn missing_tts_program_is_a_synthesis_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EdgeTtsCommand::new("herodo-no-such-tts")
        .synthesize("hi", "en-GB-RyanNeural", &dir.path().join("a.mp3"))
        .unwrap_err();
    assert!(matches!(err, HerodoError::Synthesis(_)));
}
