//! Frame history owned by the engine and borrowed views over it.
//!
//! Frames are stored row-major in one contiguous buffer, `notes` values per
//! frame. Every transform appends to the history and hands back a [`Frames`]
//! view over the appended rows only. The history is retained until
//! [`FrameBuffer::reset`].
//!
//! Growth uses the usual amortised `Vec` strategy rather than reallocating
//! the whole history on every append; the observable contents are the same
//! as a copy-on-grow buffer. Views borrow the buffer, so they cannot be held
//! across the next append or reset.

use alloc::vec::Vec;
use core::ops::{Index, Range};
use core::slice::ChunksExact;

/// Growable, row-major frame history.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameBuffer {
    data: Vec<f32>,
    notes: usize,
}

impl FrameBuffer {
    /// Create an empty history for frames of `notes` values.
    pub fn new(notes: usize) -> Self {
        Self {
            data: Vec::new(),
            notes,
        }
    }

    /// Number of frames retained.
    pub fn len(&self) -> usize {
        if self.notes == 0 {
            0
        } else {
            self.data.len() / self.notes
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn notes(&self) -> usize {
        self.notes
    }

    /// Append `count` zeroed frames and let `fill` write them.
    ///
    /// `fill` receives the new rows as one row-major slice of
    /// `count * notes` values. Returns the frame range that was appended.
    pub fn append_with<F>(&mut self, count: usize, fill: F) -> Range<usize>
    where
        F: FnOnce(&mut [f32]),
    {
        let start = self.len();
        let old = self.data.len();
        self.data.resize(old + count * self.notes, 0.0);
        fill(&mut self.data[old..]);
        start..start + count
    }

    /// Drop every retained frame and release the storage.
    pub fn reset(&mut self) {
        self.data.clear();
        self.data.shrink_to_fit();
    }

    /// Borrow the frames in `range`.
    ///
    /// # Panics
    /// Panics if `range` extends past [`len`](Self::len).
    pub fn view(&self, range: Range<usize>) -> Frames<'_> {
        let data = &self.data[range.start * self.notes..range.end * self.notes];
        Frames::new(data, self.notes)
    }

    /// Borrow the whole history.
    pub fn all(&self) -> Frames<'_> {
        Frames::new(&self.data, self.notes)
    }
}

/// Read-only view over consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frames<'a> {
    data: &'a [f32],
    notes: usize,
}

impl<'a> Frames<'a> {
    /// Wrap a row-major slice of `notes`-wide frames.
    pub fn new(data: &'a [f32], notes: usize) -> Self {
        debug_assert!(notes == 0 || data.len() % notes == 0);
        Self { data, notes }
    }

    /// Number of frames in the view.
    pub fn len(&self) -> usize {
        if self.notes == 0 {
            0
        } else {
            self.data.len() / self.notes
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Values per frame.
    pub fn notes(&self) -> usize {
        self.notes
    }

    pub fn get(&self, frame: usize) -> Option<&'a [f32]> {
        if frame >= self.len() {
            return None;
        }
        let start = frame * self.notes;
        Some(&self.data[start..start + self.notes])
    }

    /// Iterate frames in time order.
    pub fn iter(&self) -> ChunksExact<'a, f32> {
        // chunks_exact panics on zero; an empty slice yields no chunks either way
        self.data.chunks_exact(self.notes.max(1))
    }

    /// Row-major values, `len() * notes()` long.
    pub fn as_flat(&self) -> &'a [f32] {
        self.data
    }

    /// Copy the frames out into owned vectors.
    pub fn to_vec(&self) -> Vec<Vec<f32>> {
        self.iter().map(<[f32]>::to_vec).collect()
    }
}

impl Index<usize> for Frames<'_> {
    type Output = [f32];

    fn index(&self, frame: usize) -> &[f32] {
        let start = frame * self.notes;
        &self.data[start..start + self.notes]
    }
}

impl<'a> IntoIterator for Frames<'a> {
    type Item = &'a [f32];
    type IntoIter = ChunksExact<'a, f32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
