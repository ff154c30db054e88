use kcqt::normalize::deviation_normalize;
use kcqt::{Cqt, CqtConfig};

fn config() -> CqtConfig {
    CqtConfig::default()
        .with_sample_rate(8_000)
        .with_hop(400)
        .with_min_frequency(110.0)
        .with_notes(24)
}

fn chirp(len: usize, gain: f32) -> Vec<f32> {
    (0..len)
        .map(|n| {
            let t = n as f32 / 8_000.0;
            gain * (2.0 * std::f32::consts::PI * (150.0 + 200.0 * t) * t).sin()
        })
        .collect()
}

/// Normalized analysis does not touch the frame history.
#[test]
fn analyze_normalized_leaves_history() {
    let cqt = Cqt::new(config()).unwrap();
    let out = cqt.analyze_normalized(&chirp(4_000, 1.0));
    assert_eq!(out.len(), cqt.frame_count(4_000) * 24);
    assert!(cqt.history().is_empty());
    assert!(out.iter().all(|v| v.is_finite() && *v >= 0.0));
}

/// Gain changes cancel out after normalization.
#[test]
fn analyze_normalized_gain_invariant() {
    let cqt = Cqt::new(config()).unwrap();
    let quiet = cqt.analyze_normalized(&chirp(6_000, 0.1));
    let loud = cqt.analyze_normalized(&chirp(6_000, 1.0));
    let peak = loud.iter().cloned().fold(0.0f32, f32::max);
    for (q, l) in quiet.iter().zip(&loud) {
        assert!((q - l).abs() <= 1e-3 * peak.max(1.0), "{q} vs {l}");
    }
}

/// Matches computing power frames by hand from the kernels.
#[test]
fn analyze_normalized_matches_manual() {
    let cqt = Cqt::new(config()).unwrap();
    let signal = chirp(2_000, 0.5);
    let notes = cqt.notes();
    let mut power = Vec::new();
    for frame in 0..cqt.frame_count(signal.len()) {
        let c = cqt.frame_center(frame) as isize;
        for k in cqt.kernels().iter() {
            let left = c - k.center() as isize;
            let (mut re, mut im) = (0.0f32, 0.0f32);
            for j in 0..k.len() {
                let idx = left + j as isize;
                if idx >= 0 && (idx as usize) < signal.len() {
                    re += signal[idx as usize] * k.real()[j];
                    im += signal[idx as usize] * k.imag()[j];
                }
            }
            power.push(re * re + im * im);
        }
    }
    deviation_normalize(&mut power, notes);
    let out = cqt.analyze_normalized(&signal);
    assert_eq!(out.len(), power.len());
    for (a, b) in out.iter().zip(&power) {
        assert!((a - b).abs() < 1e-4 * b.max(1.0), "{a} vs {b}");
    }
}

/// Empty input yields no frames and no NaNs.
#[test]
fn analyze_normalized_empty() {
    let cqt = Cqt::new(config()).unwrap();
    assert!(cqt.analyze_normalized(&[]).is_empty());
}
