use super::*;

const ALL: [Ease; 4] = [
    Ease::Linear,
    Ease::Smoothstep,
    Ease::InOutQuad,
    Ease::InOutCubic,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn out_of_range_progress_is_clamped() {
    for ease in ALL {
        assert_eq!(ease.apply(-3.0), 0.0);
        assert_eq!(ease.apply(7.5), 1.0);
        assert_eq!(ease.apply(f64::NAN), 0.0);
    }
}

#[test]
fn monotonic_non_decreasing_on_unit_interval() {
    for ease in ALL {
        let mut prev = ease.apply(0.0);
        for i in 1..=1000 {
            let v = ease.apply(f64::from(i) / 1000.0);
            assert!(v >= prev, "{ease:?} decreased at step {i}");
            prev = v;
        }
    }
}

#[test]
fn smoothstep_matches_cubic_hermite() {
    for p in [0.1, 0.25, 0.5, 0.8] {
        let expected = p * p * (3.0 - 2.0 * p);
        assert!((Ease::Smoothstep.apply(p) - expected).abs() < 1e-15);
    }
    assert!((Ease::Smoothstep.apply(0.5) - 0.5).abs() < 1e-15);
}

#[test]
fn smoothstep_starts_and_ends_at_rest() {
    let h = 1e-6;
    let start_velocity = (Ease::Smoothstep.apply(h) - Ease::Smoothstep.apply(0.0)) / h;
    let end_velocity = (Ease::Smoothstep.apply(1.0) - Ease::Smoothstep.apply(1.0 - h)) / h;
    assert!(start_velocity < 1e-4);
    assert!(end_velocity < 1e-4);
}

#[test]
fn default_is_smoothstep() {
    assert_eq!(Ease::default(), Ease::Smoothstep);
}
