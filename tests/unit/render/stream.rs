use super::*;

/// Encodes the sampled time into the red channel of a 1x1 frame.
struct Clock {
    duration: f64,
}

impl FrameStream for Clock {
    fn canvas(&self) -> Canvas {
        Canvas {
            width: 1,
            height: 1,
        }
    }

    fn duration_secs(&self) -> f64 {
        self.duration
    }

    fn render_at(&self, t: f64) -> FrameRGBA {
        let t = t.clamp(0.0, self.duration);
        FrameRGBA {
            width: 1,
            height: 1,
            data: vec![(t * 10.0).round() as u8, 0, 0, 255],
        }
    }
}

#[test]
fn frames_cover_duration_at_fixed_rate() {
    let clock = Clock { duration: 1.0 };
    let fps = Fps::new(10, 1).unwrap();
    let frames: Vec<_> = Frames::new(&clock, fps).collect();
    assert_eq!(frames.len(), 10);
    for (i, (idx, frame)) in frames.iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert_eq!(frame.data[0], i as u8);
    }
}

#[test]
fn frames_are_restartable() {
    let clock = Clock { duration: 0.5 };
    let fps = Fps::new(10, 1).unwrap();
    let a: Vec<_> = Frames::new(&clock, fps).collect();
    let b: Vec<_> = Frames::new(&clock, fps).collect();
    assert_eq!(a, b);
}

#[test]
fn size_hint_is_exact() {
    let clock = Clock { duration: 0.35 };
    let fps = Fps::new(10, 1).unwrap();
    let mut it = Frames::new(&clock, fps);
    assert_eq!(it.len(), 4);
    it.next();
    assert_eq!(it.len(), 3);
}

#[test]
fn arc_forwards_to_inner_stream() {
    let clock: Arc<dyn FrameStream> = Arc::new(Clock { duration: 2.0 });
    assert_eq!(clock.duration_secs(), 2.0);
    assert_eq!(clock.frame_count(Fps::new(24, 1).unwrap()), 48);
    assert_eq!(clock.render_at(1.0).data[0], 10);
}
