// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # AudioTraits
//!
//! Tolerance-aware assertions on multichannel audio buffers.
//!
//! A check answers a yes/no question about a signal: is there content on every
//! channel, is the content confined to some frequency bands, is this channel a
//! delayed copy of that one, are the channels identical? Checks are meant for audio
//! test suites, where exact float equality is too strict and ad-hoc thresholds end
//! up scattered across every test.
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! audio_traits = "0.1.0"
//! ```
//!
//! Enable `serialization` to derive `serde` traits on the selection and
//! configuration types.
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`AudioTraitResult`]. Errors are grouped by
//! [`ErrorKind`] so callers can tell bad arguments from unsupported setups:
//!
//! ```rust
//! use audio_traits::{AudioTraitError, ErrorKind, FreqBand};
//!
//! match FreqBand::range(200.0, 100.0) {
//!     Err(err) => assert_eq!(err.kind(), ErrorKind::Validation),
//!     Ok(band) => panic!("accepted an inverted band: {band:?}"),
//! }
//!
//! let err = AudioTraitError::UnsupportedLength { requested: 8, fft_length: 8 };
//! assert_eq!(err.kind(), ErrorKind::UnsupportedConfiguration);
//! ```
//!
//! ## Quick Start
//!
//! ### Wrapping Audio
//!
//! ```rust
//! use audio_traits::{MatrixSignal, RawSignal, Signal};
//! use ndarray::array;
//!
//! // Borrow existing buffers
//! let left = [0.1f32, 0.5, -0.3];
//! let right = [0.8f32, -0.2, 0.4];
//! let borrowed = RawSignal::new(&[&left, &right]).unwrap();
//!
//! // Or own a (channels, samples) matrix
//! let owned = MatrixSignal::new(array![[0.1f32, 0.5, -0.3], [0.8, -0.2, 0.4]]);
//! assert_eq!(borrowed.channel(1).unwrap(), owned.channel(1).unwrap());
//! ```
//!
//! ### Checking Traits
//!
//! ```rust
//! use audio_traits::{check, AudioTrait, ChannelSelection, Freqs, MatrixSignal};
//!
//! let sample_rate = 48_000.0;
//! let tone: Vec<f32> = (0..8192)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate).sin())
//!     .collect();
//! let signal = MatrixSignal::from_channels(vec![tone.clone(), tone]).unwrap();
//! let all = ChannelSelection::all();
//!
//! assert!(check(&signal, &all, &AudioTrait::has_signal_on_all_channels()).unwrap());
//! assert!(check(&signal, &all, &AudioTrait::has_identical_channels()).unwrap());
//! assert!(check(&signal, &all, &AudioTrait::has_signal_only_below(1000.0, sample_rate)).unwrap());
//!
//! let a440 = Freqs::new().with_frequency(440.0).unwrap();
//! assert!(check(&signal, &all, &AudioTrait::has_signal_in_all_bands(&a440, sample_rate)).unwrap());
//! ```
//!
//! ### Spectra
//!
//! The spectral checks are built on [`FrequencyDomainAnalyzer`], which in turn uses
//! [`RealValuedFft`], a radix-2/4 transform for real input. Both can be used directly:
//!
//! ```rust
//! use audio_traits::RealValuedFft;
//!
//! let fft = RealValuedFft::new(16).unwrap();
//! let mut impulse = vec![0.0f32; 16];
//! impulse[0] = 1.0;
//! let bins = fft.forward(&impulse).unwrap();
//! assert_eq!(bins.len(), 9);
//! assert!(bins.iter().all(|bin| (bin.re - 1.0).abs() < 1e-6 && bin.im.abs() < 1e-6));
//! ```

pub mod checks;
pub mod error;
pub mod operations;
pub mod selection;
pub mod signal;
pub mod utils;

pub use crate::checks::{
    AudioTrait, DEFAULT_BAND_THRESHOLD_DB, DEFAULT_PRESENCE_THRESHOLD_DB, MAX_AMPLITUDE_TOLERANCE_DB,
    MAX_DELAY_RATIO, MAX_TIME_TOLERANCE_SAMPLES, check,
};
pub use crate::error::{AudioTraitError, AudioTraitResult, ErrorKind};
pub use crate::operations::{
    AnalyzerConfig, DEFAULT_FRAME_SIZE, DcBinPolicy, FrequencyDomainAnalyzer, MAX_FFT_LENGTH,
    MIN_FFT_LENGTH, Radix, RealValuedFft,
};
pub use crate::selection::{
    ChannelSelection, FreqBand, Freqs, FrequencySelection, MAX_CHANNEL_NUMBER, SelectionItem,
};
pub use crate::signal::{MatrixSignal, RawSignal, Signal};
pub use crate::utils::audio_math;
pub use crate::utils::comparison::{buffers_match_db, samples_match_db};
