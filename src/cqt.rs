//! Constant-Q Transform engine.
//!
//! [`Cqt`] owns the configuration, the kernel bank and the frame history.
//! Each call to [`Cqt::transform`] analyses only the samples it is given:
//! frame centers start at `hop / 2` of that buffer and advance by `hop` while
//! they stay inside it. Consecutive calls are therefore not equivalent to one
//! call on the concatenated signal; frame positions restart with every chunk.
//!
//! Energies are complex-correlation magnitudes scaled by [`ENERGY_SCALE`] so
//! that they sit on the same scale as the STFT magnitudes used alongside.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use libm::sqrtf;

use crate::config::CqtConfig;
use crate::frames::{FrameBuffer, Frames};
use crate::kernel::{Kernel, KernelBank};
use crate::normalize::deviation_normalize;

/// Fixed calibration factor applied to every energy value.
pub const ENERGY_SCALE: f32 = 32.0;

/// Errors raised while configuring a CQT engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CqtError {
    /// Sample rate was zero.
    InvalidSampleRate,
    /// Hop size was zero.
    InvalidHopSize,
    /// Note count was zero.
    InvalidNoteCount,
    /// Bins per octave was zero.
    InvalidBinsPerOctave,
    /// Minimum frequency was non-positive or non-finite.
    InvalidMinFrequency,
    /// Filter scale was non-positive or non-finite.
    InvalidFilterScale,
    /// A window shorter than two samples was requested.
    WindowTooShort,
}

impl fmt::Display for CqtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CqtError::InvalidSampleRate => write!(f, "sample rate must be positive"),
            CqtError::InvalidHopSize => write!(f, "hop size must be at least 1"),
            CqtError::InvalidNoteCount => write!(f, "note count must be at least 1"),
            CqtError::InvalidBinsPerOctave => write!(f, "bins per octave must be at least 1"),
            CqtError::InvalidMinFrequency => {
                write!(f, "minimum frequency must be finite and positive")
            }
            CqtError::InvalidFilterScale => write!(f, "filter scale must be finite and positive"),
            CqtError::WindowTooShort => write!(
                f,
                "window length must be at least {}",
                crate::window::MIN_WINDOW_LEN
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CqtError {}

/// Stateful Constant-Q Transform engine.
///
/// # Example
/// ```
/// use kcqt::{Cqt, CqtConfig};
///
/// let cfg = CqtConfig::default().with_notes(12);
/// let mut cqt = Cqt::new(cfg).unwrap();
/// let first = cqt.transform(&[0.0; 2205]).len();
/// let second = cqt.transform(&[0.0; 4410]).len();
/// assert_eq!((first, second), (1, 2));
/// assert_eq!(cqt.history().len(), 3);
/// cqt.reset();
/// assert!(cqt.history().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Cqt {
    config: CqtConfig,
    kernels: KernelBank,
    output: FrameBuffer,
}

impl Cqt {
    /// Validate `config` and build the kernel bank.
    pub fn new(config: CqtConfig) -> Result<Self, CqtError> {
        let kernels = KernelBank::new(&config)?;
        if 2.0 * config.max_frequency() >= config.sample_rate as f32 {
            warn_log!(
                "top CQT note {} Hz is at or above Nyquist for {} Hz",
                config.max_frequency(),
                config.sample_rate
            );
        }
        Ok(Self {
            config,
            kernels,
            output: FrameBuffer::new(config.notes),
        })
    }

    pub fn config(&self) -> &CqtConfig {
        &self.config
    }

    pub fn kernels(&self) -> &KernelBank {
        &self.kernels
    }

    /// Values per frame.
    pub fn notes(&self) -> usize {
        self.config.notes
    }

    /// Center frequency of every note, in note order.
    pub fn frequencies(&self) -> Vec<f32> {
        self.kernels.iter().map(Kernel::frequency).collect()
    }

    /// Number of frames a buffer of `len` samples produces.
    ///
    /// `ceil((len - hop / 2) / hop)`, or zero when `len <= hop / 2`.
    pub fn frame_count(&self, len: usize) -> usize {
        let first = self.config.hop / 2;
        if len <= first {
            0
        } else {
            (len - first).div_ceil(self.config.hop)
        }
    }

    /// Sample offset of frame `index` relative to the start of its chunk.
    pub fn frame_center(&self, index: usize) -> usize {
        self.config.hop / 2 + index * self.config.hop
    }

    /// Analyse `samples` and append the frames to the history.
    ///
    /// Returns a view over the frames appended by this call. The view
    /// borrows the engine and ends at the next `transform` or `reset`.
    pub fn transform(&mut self, samples: &[f32]) -> Frames<'_> {
        let count = self.frame_count(samples.len());
        let notes = self.config.notes;
        let hop = self.config.hop;
        let kernels = &self.kernels;
        let range = self.output.append_with(count, |rows| {
            for (index, frame) in rows.chunks_exact_mut(notes).enumerate() {
                let center = hop / 2 + index * hop;
                energy_frame(kernels, samples, center, frame);
            }
        });
        debug_log!(
            "cqt: {} samples -> {} frames, history {}",
            samples.len(),
            count,
            self.output.len()
        );
        self.output.view(range)
    }

    /// Same as [`transform`](Self::transform) with frames computed in parallel.
    ///
    /// Requires the `parallel` feature, which enables the
    /// [`rayon`](https://crates.io/crates/rayon) dependency. Output is
    /// identical to the sequential path.
    #[cfg(feature = "parallel")]
    pub fn transform_parallel(&mut self, samples: &[f32]) -> Frames<'_> {
        use rayon::prelude::*;
        let count = self.frame_count(samples.len());
        let notes = self.config.notes;
        let hop = self.config.hop;
        let kernels = &self.kernels;
        let range = self.output.append_with(count, |rows| {
            rows.par_chunks_exact_mut(notes)
                .enumerate()
                .for_each(|(index, frame)| {
                    let center = hop / 2 + index * hop;
                    energy_frame(kernels, samples, center, frame);
                });
        });
        debug_log!(
            "cqt (parallel): {} samples -> {} frames, history {}",
            samples.len(),
            count,
            self.output.len()
        );
        self.output.view(range)
    }

    /// Every frame retained since construction or the last reset.
    pub fn history(&self) -> Frames<'_> {
        self.output.all()
    }

    /// Drop the retained history. Safe to call on an empty history.
    pub fn reset(&mut self) {
        debug_log!("cqt: reset, dropping {} frames", self.output.len());
        self.output.reset();
    }

    /// Power frames of `samples` normalized by the spread of frame energy.
    ///
    /// Computes `re² + im²` per note without the fixed scale, then applies
    /// [`deviation_normalize`]. The history is not touched. Returns
    /// row-major values, `notes` per frame.
    pub fn analyze_normalized(&self, samples: &[f32]) -> Vec<f32> {
        let count = self.frame_count(samples.len());
        let notes = self.config.notes;
        let mut power = vec![0.0f32; count * notes];
        for (index, frame) in power.chunks_exact_mut(notes).enumerate() {
            let center = self.frame_center(index);
            for (kernel, p) in self.kernels.iter().zip(frame.iter_mut()) {
                let (re, im) = kernel.correlate(samples, center);
                *p = re * re + im * im;
            }
        }
        deviation_normalize(&mut power, notes);
        power
    }
}

impl Default for Cqt {
    fn default() -> Self {
        let config = CqtConfig::default();
        match Self::new(config) {
            Ok(cqt) => cqt,
            // the default configuration always validates
            Err(e) => unreachable!("default CQT configuration rejected: {e}"),
        }
    }
}

/// Fill `frame` with the scaled energy of every note at `center`.
fn energy_frame(kernels: &KernelBank, samples: &[f32], center: usize, frame: &mut [f32]) {
    for (kernel, energy) in kernels.iter().zip(frame.iter_mut()) {
        let (re, im) = kernel.correlate(samples, center);
        *energy = sqrtf(re * re + im * im) * ENERGY_SCALE;
    }
}
