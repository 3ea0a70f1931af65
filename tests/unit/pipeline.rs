use std::path::Path;

use image::{Rgba, RgbaImage};

use super::*;
use crate::audio::decode::AudioDecoder;
use crate::audio::probe::MediaProbe;
use crate::audio::track::AudioTrack;
use crate::config::ResampleFilter;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Canvas;
use crate::narration::tts::SpeechSynthesizer;
use crate::research::wikipedia::ResearchBundle;

struct FakeWiki {
    images: Vec<PathBuf>,
}

impl ArticleSource for FakeWiki {
    fn research(&self, title: &str) -> HerodoResult<ResearchBundle> {
        Ok(ResearchBundle {
            title: title.to_string(),
            summary: "The siege lasted months. The city fell in spring. Trade never recovered. \
                      Historians still argue."
                .to_string(),
            image_urls: Vec::new(),
            image_paths: self.images.clone(),
        })
    }
}

struct FakeTts;

impl SpeechSynthesizer for FakeTts {
    fn synthesize(&self, _text: &str, _voice: &str, out: &Path) -> HerodoResult<()> {
        std::fs::write(out, b"fake").map_err(|e| HerodoError::synthesis(e.to_string()))
    }
}

struct FixedProbe(f64);

impl MediaProbe for FixedProbe {
    fn audio_duration(&self, _path: &Path) -> HerodoResult<f64> {
        Ok(self.0)
    }
}

/// Decodes every file as a constant tone of `secs` seconds.
struct ToneDecoder {
    secs: f64,
}

impl AudioDecoder for ToneDecoder {
    fn decode(&self, _path: &Path, sample_rate: u32, channels: u16) -> HerodoResult<AudioTrack> {
        let frames = (self.secs * f64::from(sample_rate)).round() as usize;
        AudioTrack::new(
            sample_rate,
            channels,
            vec![0.5; frames * usize::from(channels)],
        )
    }
}

fn config(dir: &Path) -> Config {
    let mut cfg = Config::default();
    cfg.video.canvas = Canvas {
        width: 18,
        height: 32,
    };
    cfg.video.filter = ResampleFilter::Triangle;
    cfg.audio.sample_rate = 8_000;
    cfg.sequence.seed = Some(11);
    cfg.narration.cache_dir = dir.join("audio");
    cfg
}

fn pipeline(dir: &Path, images: Vec<PathBuf>, probed: f64, decoded: f64) -> Pipeline {
    let cfg = config(dir);
    let narrator = Narrator::with_backends(&cfg, Arc::new(FakeTts), Arc::new(FixedProbe(probed)));
    let sync = TimelineSynchronizer::with_decoder(&cfg, Arc::new(ToneDecoder { secs: decoded }));
    Pipeline::with_parts(cfg, Box::new(FakeWiki { images }), narrator, sync)
}

fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(36, 64, Rgba([90, 60, 30, 255]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn plan_runs_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let images = vec![
        write_png(dir.path(), "a.png"),
        write_png(dir.path(), "b.png"),
    ];
    let p = pipeline(dir.path(), images, 2.0, 2.0);
    let planned = p
        .plan("Siege of Somewhere", &dir.path().join("out.mp4"), None)
        .unwrap();

    assert_eq!(planned.title, "Siege of Somewhere");
    assert_eq!(planned.script.sentences.len(), 3);
    assert_eq!(planned.clips_rendered, 2);
    assert!((planned.job.duration_secs() - 2.0).abs() < 1e-9);
    assert_eq!(planned.job.sync_action(), SyncAction::Unchanged);
    assert!(planned.warnings().is_empty());

    let mut sink = InMemorySink::new();
    let stats = planned.job.run_with_sink(&mut sink).unwrap();
    assert_eq!(stats.frames_total, 48);
    let report = planned.into_report(stats);
    assert_eq!(report.output, dir.path().join("out.mp4"));
    assert_eq!(report.images_found, 2);
}

#[test]
fn narration_longer_than_estimate_extends_video() {
    let dir = tempfile::tempdir().unwrap();
    let images = vec![write_png(dir.path(), "a.png")];
    let p = pipeline(dir.path(), images, 1.0, 3.0);
    let planned = p.plan("Topic", &dir.path().join("o.mp4"), None).unwrap();
    assert_eq!(
        planned.job.sync_action(),
        SyncAction::Extend { repetitions: 4 }
    );
    assert!((planned.job.duration_secs() - 3.0).abs() < 1e-9);
}

#[test]
fn no_images_is_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let p = pipeline(dir.path(), Vec::new(), 2.0, 2.0);
    let err = p.plan("Topic", &dir.path().join("o.mp4"), None).unwrap_err();
    assert!(matches!(err, HerodoError::EmptyInput(_)));
}

#[test]
fn unreadable_images_only_is_no_valid_clips() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.jpg");
    std::fs::write(&bad, b"nope").unwrap();
    let p = pipeline(dir.path(), vec![bad], 2.0, 2.0);
    let err = p.plan("Topic", &dir.path().join("o.mp4"), None).unwrap_err();
    assert!(matches!(err, HerodoError::NoValidClips(_)));
}
