//! Spectral analysis building blocks.
//!
//! ## Module Organization
//!
//! - [`real_fft`] - Real-valued mixed radix-4/radix-2 FFT engine
//! - [`spectrum`] - Frame-based normalized magnitude spectra and band-to-bin mapping
//! - [`types`] - Analyzer configuration

pub mod real_fft;
pub mod spectrum;
pub mod types;

pub use real_fft::{MAX_FFT_LENGTH, MIN_FFT_LENGTH, Radix, RealValuedFft};
pub use spectrum::{FrequencyDomainAnalyzer, validate_sample_rate};
pub use types::{AnalyzerConfig, DEFAULT_FRAME_SIZE, DcBinPolicy};
