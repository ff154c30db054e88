//! Engine configuration and derived kernel parameters.

use libm::{ceil, pow, round};

use crate::cqt::CqtError;

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default hop size, 20 frames per second at the default sample rate.
pub const DEFAULT_HOP: usize = 2205;

/// Default lowest note, C1.
pub const DEFAULT_MIN_FREQUENCY: f32 = 32.7;

/// Default number of notes, seven octaves.
pub const DEFAULT_NOTES: usize = 84;

/// Default number of notes per octave.
pub const DEFAULT_BINS_PER_OCTAVE: usize = 12;

/// Default multiplier on the quality factor.
pub const DEFAULT_FILTER_SCALE: f32 = 3.0;

/// Configuration for a [`Cqt`](crate::Cqt) engine.
///
/// All fields are fixed once the engine is constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CqtConfig {
    /// Sample rate of the analysed signal in Hz.
    pub sample_rate: u32,
    /// Samples between successive frame centers.
    pub hop: usize,
    /// Center frequency of note 0 in Hz.
    pub min_frequency: f32,
    /// Number of notes analysed per frame.
    pub notes: usize,
    /// Notes per doubling of frequency.
    pub bins_per_octave: usize,
    /// Scales the quality factor; larger values give longer kernels and
    /// sharper frequency selectivity.
    pub filter_scale: f32,
}

impl Default for CqtConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            hop: DEFAULT_HOP,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            notes: DEFAULT_NOTES,
            bins_per_octave: DEFAULT_BINS_PER_OCTAVE,
            filter_scale: DEFAULT_FILTER_SCALE,
        }
    }
}

impl CqtConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_hop(mut self, hop: usize) -> Self {
        self.hop = hop;
        self
    }

    pub fn with_min_frequency(mut self, min_frequency: f32) -> Self {
        self.min_frequency = min_frequency;
        self
    }

    pub fn with_notes(mut self, notes: usize) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_bins_per_octave(mut self, bins_per_octave: usize) -> Self {
        self.bins_per_octave = bins_per_octave;
        self
    }

    pub fn with_filter_scale(mut self, filter_scale: f32) -> Self {
        self.filter_scale = filter_scale;
        self
    }

    /// Derive the hop from a frame rate: `hop = round(sample_rate / fps)`.
    ///
    /// A non-positive or non-finite `fps` leaves a zero hop, which
    /// [`validate`](Self::validate) rejects.
    pub fn with_frame_rate(mut self, fps: f32) -> Self {
        self.hop = if fps.is_finite() && fps > 0.0 {
            round(self.sample_rate as f64 / fps as f64) as usize
        } else {
            0
        };
        self
    }

    /// Check that every field is usable for kernel construction.
    pub fn validate(&self) -> Result<(), CqtError> {
        if self.sample_rate == 0 {
            return Err(CqtError::InvalidSampleRate);
        }
        if self.hop == 0 {
            return Err(CqtError::InvalidHopSize);
        }
        if self.notes == 0 {
            return Err(CqtError::InvalidNoteCount);
        }
        if self.bins_per_octave == 0 {
            return Err(CqtError::InvalidBinsPerOctave);
        }
        if !(self.min_frequency.is_finite() && self.min_frequency > 0.0) {
            return Err(CqtError::InvalidMinFrequency);
        }
        if !(self.filter_scale.is_finite() && self.filter_scale > 0.0) {
            return Err(CqtError::InvalidFilterScale);
        }
        Ok(())
    }

    /// Quality factor `Q = filter_scale / (2^(1/bins_per_octave) - 1)`.
    pub fn quality_factor(&self) -> f64 {
        self.filter_scale as f64 / (pow(2.0, 1.0 / self.bins_per_octave as f64) - 1.0)
    }

    /// Center frequency of `note`: `fmin * 2^(note / bins_per_octave)`.
    pub fn note_frequency(&self, note: usize) -> f32 {
        (self.min_frequency as f64 * pow(2.0, note as f64 / self.bins_per_octave as f64)) as f32
    }

    /// Center frequency of the highest note.
    pub fn max_frequency(&self) -> f32 {
        self.note_frequency(self.notes.saturating_sub(1))
    }

    /// Kernel length for `note`: `ceil(Q * fs / f)`, never shorter than `hop`.
    pub fn kernel_len(&self, note: usize) -> usize {
        let freq = self.note_frequency(note) as f64;
        let len = ceil(self.quality_factor() * self.sample_rate as f64 / freq) as usize;
        len.max(self.hop)
    }
}
