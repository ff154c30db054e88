//! # kcqt - Constant-Q Transform engine for Rust
//!
//! A direct-convolution Constant-Q Transform (CQT) that turns an audio signal
//! into per-frame energy vectors over geometrically spaced notes. Each note
//! gets its own complex Blackman-Harris kernel whose length keeps the ratio of
//! center frequency to bandwidth constant.
//!
//! ## Features
//!
//! - **Incremental history**: successive [`Cqt::transform`] calls append to
//!   one frame history and return a borrowed view over the new frames only
//! - **Immutable kernels** built once at construction
//! - **`no_std` + `alloc`** core, `std` enabled by default
//! - **Parallel frames** via Rayon (optional)
//! - **WebAssembly host bridge** in the `cqt-wasm` workspace member
//!
//! ## Cargo Features
//!
//! - `std` (default): `std::error::Error` impls
//! - `parallel`: Enable [`Cqt::transform_parallel`] with Rayon
//! - `verbose-logging`: Emit `log` records for kernel construction and transforms
//!
//! ## Example
//!
//! ```
//! use kcqt::{Cqt, CqtConfig};
//!
//! let mut cqt = Cqt::new(CqtConfig::default()).unwrap();
//! let frames = cqt.transform(&vec![0.0f32; 4410]);
//! assert_eq!(frames.len(), 2);
//! assert_eq!(frames.notes(), 84);
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Emit a `log::debug!` record when `verbose-logging` is enabled.
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        log::debug!($($arg)*);
    };
}

/// Emit a `log::warn!` record when `verbose-logging` is enabled.
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        log::warn!($($arg)*);
    };
}

/// Constant-Q Transform engine
///
/// The stateful [`Cqt`] engine and its error type.
pub mod cqt;

/// Engine configuration
///
/// Sample rate, hop, note layout and the derived quality factor.
pub mod config;

/// Window functions for kernel shaping
pub mod window;

/// Per-note complex analysis kernels
pub mod kernel;

/// Frame history and borrowed frame views
pub mod frames;

/// Frame-energy deviation normalization
pub mod normalize;

pub use config::CqtConfig;
pub use cqt::{Cqt, CqtError, ENERGY_SCALE};
pub use frames::{FrameBuffer, Frames};
pub use kernel::{Kernel, KernelBank};
