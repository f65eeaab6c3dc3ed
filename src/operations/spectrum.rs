//! Frame-based magnitude spectra and band-to-bin mapping.
//!
//! The analyzer splits a channel into consecutive, non-overlapping frames of
//! `frame_size` samples (the last one zero-padded), applies a Hann window, and sums the
//! bin magnitudes of all frames. The accumulated spectrum is normalized so its loudest
//! bin is `1.0` (0 dB). Normalization is relative to each analyzed buffer, so levels of
//! two different channels cannot be compared through it.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use tracing::debug;

use crate::operations::real_fft::RealValuedFft;
use crate::operations::types::{AnalyzerConfig, DcBinPolicy};
use crate::utils::audio_math::{is_power_of_two, linear_to_db};
use crate::{AudioTraitError, AudioTraitResult, FreqBand, FrequencySelection};

/// Computes normalized bin spectra of single channels.
///
/// # Examples
/// ```rust
/// use audio_traits::{AnalyzerConfig, FreqBand, FrequencyDomainAnalyzer};
///
/// let analyzer = FrequencyDomainAnalyzer::new(AnalyzerConfig::default()).unwrap();
/// let band = FreqBand::discrete(1000.0).unwrap();
/// let bins = analyzer.bins_for_band(&band, 48_000.0).unwrap();
/// assert_eq!(bins.into_iter().collect::<Vec<_>>(), vec![85, 86]);
/// ```
#[derive(Debug, Clone)]
pub struct FrequencyDomainAnalyzer {
    config: AnalyzerConfig,
    fft: RealValuedFft,
    window: Vec<f32>,
}

impl FrequencyDomainAnalyzer {
    /// Creates an analyzer for the given configuration.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidParameter`] if the frame size is not a power of
    /// two, or [`AudioTraitError::UnsupportedLength`] if the FFT cannot be built for it.
    pub fn new(config: AnalyzerConfig) -> AudioTraitResult<Self> {
        if !is_power_of_two(config.frame_size) {
            return Err(AudioTraitError::invalid_parameter(
                "frame_size",
                format!("must be a power of two, got {}", config.frame_size),
            ));
        }

        let fft = RealValuedFft::new(config.frame_size)?;
        debug!(frame_size = config.frame_size, dc_bin = ?config.dc_bin, "created frequency-domain analyzer");

        Ok(Self {
            window: hann_window(config.frame_size),
            config,
            fft,
        })
    }

    /// The configuration this analyzer was built with.
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Frame size in samples.
    pub const fn frame_size(&self) -> usize {
        self.config.frame_size
    }

    /// Number of bins per spectrum.
    pub const fn num_bins(&self) -> usize {
        self.config.num_bins()
    }

    /// Centre frequency of `bin` in Hz.
    pub fn bin_frequency(&self, bin: usize, sample_rate: f32) -> f32 {
        (bin as f64 * f64::from(sample_rate) / self.frame_size() as f64) as f32
    }

    /// Returns the normalized linear magnitude spectrum of `samples`.
    ///
    /// The result has [`FrequencyDomainAnalyzer::num_bins`] values in `0.0..=1.0`. A silent
    /// (or empty) input yields all zeros.
    ///
    /// # Errors
    /// Propagates FFT errors; none occur for a correctly constructed analyzer.
    pub fn normalized_bin_values(&self, samples: &[f32]) -> AudioTraitResult<Vec<f32>> {
        let frame_size = self.frame_size();
        let mut accumulated = vec![0.0f32; self.num_bins()];
        let mut frame = vec![0.0f32; frame_size];

        for chunk in samples.chunks(frame_size) {
            frame.fill(0.0);
            for ((dst, &sample), &weight) in frame.iter_mut().zip(chunk).zip(&self.window) {
                *dst = sample * weight;
            }

            let bins = self.fft.forward(&frame)?;
            for (acc, bin) in accumulated.iter_mut().zip(&bins) {
                *acc += bin.norm();
            }
        }

        let max = accumulated.iter().copied().fold(0.0f32, f32::max);
        if max > 0.0 {
            accumulated.iter_mut().for_each(|value| *value /= max);
        }
        if self.config.dc_bin == DcBinPolicy::Zero {
            accumulated[0] = 0.0;
        }
        Ok(accumulated)
    }

    /// Same as [`FrequencyDomainAnalyzer::normalized_bin_values`], converted to dB.
    ///
    /// Zero bins map to [`crate::audio_math::SILENCE_DB`].
    ///
    /// # Errors
    /// Propagates FFT errors; none occur for a correctly constructed analyzer.
    pub fn normalized_bin_values_db(&self, samples: &[f32]) -> AudioTraitResult<Vec<f32>> {
        Ok(self
            .normalized_bin_values(samples)?
            .into_iter()
            .map(linear_to_db)
            .collect())
    }

    /// Maps a band onto the bins that cover it at `sample_rate`.
    ///
    /// The band edges are rounded outwards: `floor(lower / sr · F)` to
    /// `ceil(upper / sr · F)`, inclusive.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidParameter`] for a non-positive sample rate and
    /// [`AudioTraitError::InvalidFrequencyRange`] if the band reaches past Nyquist.
    pub fn bins_for_band(&self, band: &FreqBand, sample_rate: f32) -> AudioTraitResult<BTreeSet<usize>> {
        validate_sample_rate(sample_rate)?;

        let scale = self.frame_size() as f64 / f64::from(sample_rate);
        let start = (f64::from(band.lower()) * scale).floor();
        let end = (f64::from(band.upper()) * scale).ceil();
        if start < 0.0 || end >= self.num_bins() as f64 {
            return Err(AudioTraitError::InvalidFrequencyRange(format!(
                "band {} Hz to {} Hz does not fit below Nyquist ({} Hz)",
                band.lower(),
                band.upper(),
                sample_rate / 2.0
            )));
        }

        Ok((start as usize..=end as usize).collect())
    }

    /// Union of the bins of every band in `selection`.
    ///
    /// # Errors
    /// Same as [`FrequencyDomainAnalyzer::bins_for_band`], for the first failing band.
    pub fn bins_for_selection(
        &self,
        selection: &FrequencySelection,
        sample_rate: f32,
    ) -> AudioTraitResult<BTreeSet<usize>> {
        selection.bands().iter().try_fold(BTreeSet::new(), |mut bins, band| -> AudioTraitResult<_> {
            bins.extend(self.bins_for_band(band, sample_rate)?);
            Ok(bins)
        })
    }
}

/// Checks that `sample_rate` is a finite, positive number of Hz.
///
/// # Errors
/// Returns [`AudioTraitError::InvalidParameter`] otherwise.
pub fn validate_sample_rate(sample_rate: f32) -> AudioTraitResult<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(AudioTraitError::invalid_parameter(
            "sample_rate",
            format!("must be positive, got {sample_rate}"),
        ))
    }
}

/// Symmetric Hann window, `0.5·(1 − cos(2πi/(len − 1)))`.
fn hann_window(len: usize) -> Vec<f32> {
    let denominator = len.saturating_sub(1).max(1) as f64;
    (0..len)
        .map(|i| (0.5 * (1.0 - (2.0 * PI * i as f64 / denominator).cos())) as f32)
        .collect()
}
