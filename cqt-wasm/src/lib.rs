//! WebAssembly host bridge for the kcqt engine.
//!
//! JavaScript usage:
//!
//! ```js
//! const cqt = new CQT(44100, 2205, 32.7, 84, 12, 3);
//! const frames = cqt.cqt(samples); // Float32Array[] over wasm memory
//! cqt.clearOutput();
//! ```
//!
//! The arrays returned by `cqt` are views into the engine's frame history,
//! not copies. They stay valid until the next `cqt` or `clearOutput` call;
//! any wasm memory growth detaches them as well. Copy them (`slice()`) to
//! keep the data.

use js_sys::{Array, Float32Array};
use kcqt::{Cqt, CqtConfig, CqtError, Frames};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// CQT engine exported to JavaScript as `CQT`.
#[wasm_bindgen(js_name = CQT)]
pub struct WasmCqt {
    inner: Cqt,
}

#[wasm_bindgen(js_class = CQT)]
impl WasmCqt {
    /// Omitted arguments fall back to the library defaults
    /// (44100, 2205, 32.7, 84, 12, 3).
    #[wasm_bindgen(constructor)]
    pub fn new(
        fs: Option<u32>,
        hop: Option<usize>,
        fmin: Option<f32>,
        notes: Option<usize>,
        bins_per_octave: Option<usize>,
        filter_scale: Option<f32>,
    ) -> Result<WasmCqt, JsValue> {
        let config = config_from_args(fs, hop, fmin, notes, bins_per_octave, filter_scale);
        WasmCqt::build(config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Analyse `input` and return views over the newly appended frames.
    pub fn cqt(&mut self, input: &[f32]) -> Array {
        frames_to_views(self.inner.transform(input))
    }

    /// Analyse `input` and return a row-major copy of the new frames.
    #[wasm_bindgen(js_name = cqtFlat)]
    pub fn cqt_flat(&mut self, input: &[f32]) -> Vec<f32> {
        self.inner.transform(input).as_flat().to_vec()
    }

    /// Drop every retained frame; previously returned views become invalid.
    #[wasm_bindgen(js_name = clearOutput)]
    pub fn clear_output(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn notes(&self) -> usize {
        self.inner.notes()
    }

    #[wasm_bindgen(getter)]
    pub fn hop(&self) -> usize {
        self.inner.config().hop
    }

    /// Frames retained since construction or the last `clearOutput`.
    #[wasm_bindgen(getter)]
    pub fn frames(&self) -> usize {
        self.inner.history().len()
    }

    /// Center frequency of every note in Hz.
    pub fn frequencies(&self) -> Vec<f32> {
        self.inner.frequencies()
    }
}

impl WasmCqt {
    /// Build from a Rust configuration without touching JS values.
    pub fn build(config: CqtConfig) -> Result<WasmCqt, CqtError> {
        Ok(WasmCqt {
            inner: Cqt::new(config)?,
        })
    }
}

fn config_from_args(
    fs: Option<u32>,
    hop: Option<usize>,
    fmin: Option<f32>,
    notes: Option<usize>,
    bins_per_octave: Option<usize>,
    filter_scale: Option<f32>,
) -> CqtConfig {
    let d = CqtConfig::default();
    CqtConfig {
        sample_rate: fs.unwrap_or(d.sample_rate),
        hop: hop.unwrap_or(d.hop),
        min_frequency: fmin.unwrap_or(d.min_frequency),
        notes: notes.unwrap_or(d.notes),
        bins_per_octave: bins_per_octave.unwrap_or(d.bins_per_octave),
        filter_scale: filter_scale.unwrap_or(d.filter_scale),
    }
}

fn frames_to_views(frames: Frames<'_>) -> Array {
    frames
        .iter()
        // SAFETY: each view aliases the engine's history. The caller-facing
        // contract limits its use to before the next mutating call, and the
        // conversion itself does not allocate in Rust.
        .map(|frame| unsafe { Float32Array::view(frame) })
        .collect()
}
