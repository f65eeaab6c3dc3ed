//! Utility functions shared by the analysis code.
//!
//! # Modules
//!
//! - [`audio_math`] - dB/linear conversions and power-of-two helpers
//! - [`comparison`] - dB-tolerant sample-by-sample buffer comparison

pub mod audio_math;
pub mod comparison;

pub use audio_math::*;
pub use comparison::*;
