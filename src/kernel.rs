//! Complex analysis kernels, one per note.
//!
//! A kernel is a Blackman-Harris window modulated by a complex oscillator at
//! the note's center frequency, stored as separate real and imaginary parts.
//! The oscillator phase is zero at the kernel center `len / 2`.

use alloc::vec::Vec;
use core::f64::consts::PI;

use libm::{cos, sin};

use crate::config::CqtConfig;
use crate::cqt::CqtError;
use crate::window::blackman_harris;

/// Windowed complex oscillator for a single note.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    frequency: f32,
    re: Vec<f32>,
    im: Vec<f32>,
}

impl Kernel {
    /// Build a kernel of `len` samples centered on `frequency` Hz.
    pub fn new(frequency: f32, len: usize, sample_rate: u32) -> Result<Self, CqtError> {
        let mut re = blackman_harris(len)?;
        let mut im = re.clone();
        let omega = 2.0 * PI * frequency as f64 / sample_rate as f64;
        let half = (len / 2) as f64;
        for (j, (r, i)) in re.iter_mut().zip(im.iter_mut()).enumerate() {
            let angle = omega * (j as f64 - half);
            *r *= cos(angle) as f32;
            *i *= sin(angle) as f32;
        }
        Ok(Self { frequency, re, im })
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn len(&self) -> usize {
        self.re.len()
    }

    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    /// Index aligned with the frame center during convolution.
    pub fn center(&self) -> usize {
        self.re.len() / 2
    }

    pub fn real(&self) -> &[f32] {
        &self.re
    }

    pub fn imag(&self) -> &[f32] {
        &self.im
    }

    /// Correlate the kernel with `signal`, centering it on sample `center`.
    ///
    /// Kernel taps that fall outside `signal` are skipped. Returns the
    /// real and imaginary sums.
    pub(crate) fn correlate(&self, signal: &[f32], center: usize) -> (f32, f32) {
        let len = self.len() as isize;
        let left = center as isize - self.center() as isize;
        let start = (-left).max(0);
        let end = len.min(signal.len() as isize - left);
        if end <= start {
            return (0.0, 0.0);
        }
        let (start, end) = (start as usize, end as usize);
        let offset = (left + start as isize) as usize;
        let x = &signal[offset..offset + (end - start)];
        let mut sum_r = 0.0f32;
        let mut sum_i = 0.0f32;
        for ((&s, &r), &i) in x.iter().zip(&self.re[start..end]).zip(&self.im[start..end]) {
            sum_r += s * r;
            sum_i += s * i;
        }
        (sum_r, sum_i)
    }
}

/// The immutable kernel set of an engine, indexed by note.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelBank {
    kernels: Vec<Kernel>,
}

impl KernelBank {
    /// Build one kernel per note of `config`.
    ///
    /// The configuration is validated first; a kernel shorter than two
    /// samples fails with [`CqtError::WindowTooShort`].
    pub fn new(config: &CqtConfig) -> Result<Self, CqtError> {
        config.validate()?;
        let mut kernels = Vec::with_capacity(config.notes);
        for note in 0..config.notes {
            let freq = config.note_frequency(note);
            kernels.push(Kernel::new(
                freq,
                config.kernel_len(note),
                config.sample_rate,
            )?);
        }
        let bank = Self { kernels };
        debug_log!(
            "built {} CQT kernels: max len {}, total len {}",
            bank.len(),
            bank.max_len(),
            bank.total_len()
        );
        Ok(bank)
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    pub fn get(&self, note: usize) -> Option<&Kernel> {
        self.kernels.get(note)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Kernel> {
        self.kernels.iter()
    }

    /// Length of the longest kernel (note 0 unless clamped by the hop).
    pub fn max_len(&self) -> usize {
        self.kernels.iter().map(Kernel::len).max().unwrap_or(0)
    }

    /// Sum of all kernel lengths: multiply-adds per frame, per component.
    pub fn total_len(&self) -> usize {
        self.kernels.iter().map(Kernel::len).sum()
    }
}

impl<'a> IntoIterator for &'a KernelBank {
    type Item = &'a Kernel;
    type IntoIter = core::slice::Iter<'a, Kernel>;

    fn into_iter(self) -> Self::IntoIter {
        self.kernels.iter()
    }
}
