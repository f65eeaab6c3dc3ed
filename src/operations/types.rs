//! Configuration types for spectral analysis.

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Frame size used when no other is configured.
pub const DEFAULT_FRAME_SIZE: usize = 4096;

/// What to do with the DC (0 Hz) bin after normalization.
///
/// A constant offset is not frequency content of interest for band checks, so the
/// default clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum DcBinPolicy {
    /// Set the DC bin to zero.
    #[default]
    Zero,
    /// Keep the DC bin as computed.
    Keep,
}

/// Configuration for [`crate::FrequencyDomainAnalyzer`].
///
/// # Examples
/// ```rust
/// use audio_traits::{AnalyzerConfig, DcBinPolicy};
///
/// let config = AnalyzerConfig::new().with_frame_size(1024).with_dc_bin(DcBinPolicy::Keep);
/// assert_eq!(config.frame_size, 1024);
/// assert_eq!(AnalyzerConfig::default().frame_size, 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct AnalyzerConfig {
    /// Length of each analysis frame in samples; must be a supported power of two.
    pub frame_size: usize,
    /// Handling of the DC bin.
    pub dc_bin: DcBinPolicy,
}

impl AnalyzerConfig {
    /// Creates the default configuration (4096-sample frames, DC bin cleared).
    pub const fn new() -> Self {
        Self {
            frame_size: DEFAULT_FRAME_SIZE,
            dc_bin: DcBinPolicy::Zero,
        }
    }

    /// Sets the frame size.
    pub const fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Sets the DC bin policy.
    pub const fn with_dc_bin(mut self, dc_bin: DcBinPolicy) -> Self {
        self.dc_bin = dc_bin;
        self
    }

    /// Number of bins per spectrum (`frame_size / 2 + 1`).
    pub const fn num_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::new()
    }
}
