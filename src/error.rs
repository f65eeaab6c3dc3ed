//! Error types and result utilities for audio trait evaluation.
//!
//! Every contract violation is reported synchronously by the call that detects it.
//! There is no recovery path: a check either yields a boolean verdict or one of the
//! errors below, which the calling test harness is expected to surface.

use thiserror::Error;

/// Convenience type alias for results that may contain an [`AudioTraitError`].
pub type AudioTraitResult<T> = Result<T, AudioTraitError>;

/// Coarse classification of [`AudioTraitError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed selections, out-of-range channels or invalid check parameters.
    Validation,
    /// An FFT length that cannot be built from radix-4/radix-2 stages.
    UnsupportedConfiguration,
    /// Buffer or reference lengths that violate a length contract.
    SizeMismatch,
}

/// Error types that can occur while building selections, running the FFT or
/// evaluating audio traits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioTraitError {
    /// A channel selection item was malformed (channel 0, inverted range).
    #[error("Invalid channel selection: {0}")]
    InvalidChannelSelection(String),

    /// A frequency band was malformed (non-positive bound, inverted range).
    #[error("Invalid frequency band: {0}")]
    InvalidFrequencyBand(String),

    /// A selected channel (1-based) does not exist in the signal.
    #[error("Channel {channel} is out of range for a signal with {num_channels} channel(s)")]
    ChannelOutOfRange {
        /// The offending channel number (1-based).
        channel: usize,
        /// Number of channels the signal actually has.
        num_channels: usize,
    },

    /// A frequency band cannot be mapped onto the bins of the analysis frame.
    ///
    /// This happens when the band reaches past the Nyquist frequency for the
    /// sample rate it is evaluated against.
    #[error("Invalid frequency range: {0}")]
    InvalidFrequencyRange(String),

    /// A check parameter is outside its legal domain.
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// Name of the parameter.
        param: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The signal handed to a check cannot be analysed (e.g. it has no samples).
    #[error("Invalid signal: {0}")]
    InvalidSignal(String),

    /// The requested transform length is not constructible from the supported radices.
    #[error("Unsupported FFT length: requested {requested}, rounded to {fft_length}")]
    UnsupportedLength {
        /// Length asked for by the caller.
        requested: usize,
        /// Power-of-two length it was rounded up to.
        fft_length: usize,
    },

    /// A transform input is shorter than the transform requires.
    #[error("Invalid input length: expected at least {expected}, got {actual}")]
    InvalidInputLength {
        /// Minimum number of values required.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// The reference signal of a delay check does not cover the compared span.
    #[error("Reference signal too short: needs at least {required} samples, has {actual}")]
    ReferenceTooShort {
        /// Minimum number of reference samples.
        required: usize,
        /// Number of samples the reference has.
        actual: usize,
    },

    /// Two buffers that must have equal lengths do not.
    #[error("Size mismatch: {0}")]
    SizeMismatch(String),
}

impl AudioTraitError {
    /// Creates an [`AudioTraitError::InvalidParameter`].
    pub fn invalid_parameter(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param,
            reason: reason.into(),
        }
    }

    /// Creates an [`AudioTraitError::SizeMismatch`].
    pub fn size_mismatch(details: impl Into<String>) -> Self {
        Self::SizeMismatch(details.into())
    }

    /// Returns the taxonomy bucket this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedLength { .. } => ErrorKind::UnsupportedConfiguration,
            Self::InvalidInputLength { .. }
            | Self::ReferenceTooShort { .. }
            | Self::SizeMismatch(_) => ErrorKind::SizeMismatch,
            Self::InvalidChannelSelection(_)
            | Self::InvalidFrequencyBand(_)
            | Self::ChannelOutOfRange { .. }
            | Self::InvalidFrequencyRange(_)
            | Self::InvalidParameter { .. }
            | Self::InvalidSignal(_) => ErrorKind::Validation,
        }
    }
}
