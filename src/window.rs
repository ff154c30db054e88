//! Window functions for CQT kernels

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::PI;

use libm::cos;

use crate::cqt::CqtError;

/// Smallest window length with a defined `N - 1` denominator.
pub const MIN_WINDOW_LEN: usize = 2;

const A0: f64 = 0.35875;
const A1: f64 = 0.48829;
const A2: f64 = 0.14128;
const A3: f64 = 0.01168;

/// Generate a Blackman-Harris window of length `len` whose weights sum to 1.
///
/// The normalization is applied to the window itself, so a kernel built from
/// it has unit gain for a DC-aligned input before modulation.
pub fn blackman_harris(len: usize) -> Result<Vec<f32>, CqtError> {
    let mut out = vec![0.0f32; len];
    blackman_harris_inplace(&mut out)?;
    Ok(out)
}

/// Fill `out` with a unit-sum Blackman-Harris window (no heap).
///
/// Returns [`CqtError::WindowTooShort`] when `out.len() < 2`.
pub fn blackman_harris_inplace(out: &mut [f32]) -> Result<(), CqtError> {
    let n = out.len();
    if n < MIN_WINDOW_LEN {
        return Err(CqtError::WindowTooShort);
    }
    let step = 2.0 * PI / (n - 1) as f64;
    let mut sum = 0.0f64;
    for (i, w) in out.iter_mut().enumerate() {
        let x = step * i as f64;
        let raw = A0 - A1 * cos(x) + A2 * cos(2.0 * x) - A3 * cos(3.0 * x);
        sum += raw;
        *w = raw as f32;
    }
    let inv = (1.0 / sum) as f32;
    for w in out.iter_mut() {
        *w *= inv;
    }
    Ok(())
}
