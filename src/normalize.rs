//! Frame-energy deviation normalization.
//!
//! An alternative to the fixed [`ENERGY_SCALE`](crate::ENERGY_SCALE) for
//! offline analysis of a whole signal: power values are divided by the
//! standard deviation of per-frame total energy, then square-rooted. Loud and
//! quiet recordings end up on a comparable scale.

use alloc::vec::Vec;

use libm::sqrtf;

/// Added to the squared deviations so silent input never divides by zero.
pub const SIGMA_FLOOR: f32 = 1e-8;

/// Normalize row-major power frames in place.
///
/// For frame energies `E_t = sum(power[t])` with mean `mu`, computes
/// `sigma = sqrt((SIGMA_FLOOR + sum((E_t - mu)^2)) / max(n - 1, 1))` and
/// replaces every value `p` with `sqrt(p / sigma)`. `power.len()` should be a
/// multiple of `notes`; a trailing partial frame is left untouched.
pub fn deviation_normalize(power: &mut [f32], notes: usize) {
    if notes == 0 {
        return;
    }
    let energies: Vec<f32> = power
        .chunks_exact(notes)
        .map(|frame| frame.iter().sum())
        .collect();
    let n = energies.len();
    if n == 0 {
        return;
    }
    let mean = energies.iter().sum::<f32>() / n as f32;
    let spread: f32 = energies.iter().map(|&e| (e - mean) * (e - mean)).sum();
    let sigma = sqrtf((SIGMA_FLOOR + spread) / n.saturating_sub(1).max(1) as f32);
    for p in power[..n * notes].iter_mut() {
        *p = sqrtf(*p / sigma);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_silence_stays_zero() {
        let mut p = vec![0.0f32; 12];
        deviation_normalize(&mut p, 3);
        assert!(p.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_scale_invariance() {
        let base = vec![1.0f32, 0.0, 4.0, 0.5, 9.0, 1.0];
        let mut a = base.clone();
        let mut b: Vec<f32> = base.iter().map(|x| x * 100.0).collect();
        deviation_normalize(&mut a, 2);
        deviation_normalize(&mut b, 2);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-3, "{x} vs {y}");
        }
    }

    #[test]
    fn test_known_sigma() {
        // energies 1 and 3: mean 2, spread 2, sigma = sqrt(2 / 1)
        let mut p = vec![1.0f32, 0.0, 2.0, 1.0];
        deviation_normalize(&mut p, 2);
        let sigma = 2.0f32.sqrt();
        assert!((p[0] - (1.0 / sigma).sqrt()).abs() < 1e-5);
        assert!((p[2] - (2.0 / sigma).sqrt()).abs() < 1e-5);
        assert_eq!(p[1], 0.0);
    }

    #[test]
    fn test_single_frame_is_finite() {
        let mut p = vec![4.0f32, 1.0];
        deviation_normalize(&mut p, 2);
        assert!(p.iter().all(|x| x.is_finite()));
    }
}
