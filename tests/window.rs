//! Tests for the Blackman-Harris kernel window: normalization and edge cases.

use kcqt::window::{blackman_harris, blackman_harris_inplace, MIN_WINDOW_LEN};
use kcqt::CqtError;

/// Allowed floating-point error when verifying normalization.
const EPSILON: f64 = 1e-4;

fn sum(slice: &[f32]) -> f64 {
    slice.iter().map(|&x| x as f64).sum()
}

/// Unit sum holds from the shortest window up to the default lowest note.
#[test]
fn blackman_harris_unit_sum() {
    for &n in &[MIN_WINDOW_LEN, 5, 64, 1024, 4097, 68_040] {
        let w = blackman_harris(n).unwrap();
        assert!((sum(&w) - 1.0).abs() < EPSILON, "n = {n}");
    }
}

/// Coefficients match the four-term Blackman-Harris definition before scaling.
#[test]
fn blackman_harris_shape() {
    let n = 33;
    let w = blackman_harris(n).unwrap();
    let raw: Vec<f64> = (0..n)
        .map(|i| {
            let x = 2.0 * std::f64::consts::PI * i as f64 / (n - 1) as f64;
            0.35875 - 0.48829 * x.cos() + 0.14128 * (2.0 * x).cos() - 0.01168 * (3.0 * x).cos()
        })
        .collect();
    let total: f64 = raw.iter().sum();
    for (a, b) in w.iter().zip(raw.iter()) {
        assert!((*a as f64 - b / total).abs() < 1e-7);
    }
}

/// Lengths that would divide by zero are rejected instead.
#[test]
fn blackman_harris_rejects_short() {
    assert!(matches!(blackman_harris(0), Err(CqtError::WindowTooShort)));
    assert!(matches!(blackman_harris(1), Err(CqtError::WindowTooShort)));
    let mut one = [0.0f32; 1];
    assert_eq!(
        blackman_harris_inplace(&mut one),
        Err(CqtError::WindowTooShort)
    );
    assert_eq!(one, [0.0]);
}

/// The stack variant writes the same weights as the allocating one.
#[test]
fn blackman_harris_inplace_stack() {
    let mut buf = [0.0f32; 128];
    blackman_harris_inplace(&mut buf).unwrap();
    assert_eq!(buf.to_vec(), blackman_harris(128).unwrap());
}
