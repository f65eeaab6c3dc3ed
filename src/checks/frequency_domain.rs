//! Predicates evaluated on normalized magnitude spectra.
//!
//! Each selected channel is analysed on its own with a [`FrequencyDomainAnalyzer`], so
//! thresholds are relative to that channel's loudest bin (0 dB).

use std::collections::BTreeSet;

use tracing::trace;

use super::channel_samples;
use crate::operations::spectrum::validate_sample_rate;
use crate::{AudioTraitResult, FreqBand, FrequencyDomainAnalyzer, FrequencySelection, Signal};

/// Returns true if every channel has content in every band of `bands`.
///
/// A band has content if at least one of its bins reaches `threshold_db`. An empty
/// `bands` selection always yields `false`.
///
/// # Errors
/// Returns [`crate::AudioTraitError::InvalidFrequencyRange`] if a band does not fit below
/// Nyquist at `sample_rate` (checked before any channel is analysed), or
/// [`crate::AudioTraitError::ChannelOutOfRange`] for a channel the signal lacks.
pub fn has_signal_in_all_bands<S: Signal + ?Sized>(
    signal: &S,
    channels: &BTreeSet<usize>,
    bands: &FrequencySelection,
    sample_rate: f32,
    threshold_db: f32,
    analyzer: &FrequencyDomainAnalyzer,
) -> AudioTraitResult<bool> {
    if bands.is_empty() {
        trace!("empty frequency selection");
        return Ok(false);
    }

    let mut band_bins = Vec::with_capacity(bands.len());
    for band in bands.bands() {
        band_bins.push((band, analyzer.bins_for_band(band, sample_rate)?));
    }

    for &channel in channels {
        let spectrum = analyzer.normalized_bin_values_db(channel_samples(signal, channel)?)?;
        for (band, bins) in &band_bins {
            if !bins.iter().any(|&bin| spectrum[bin] >= threshold_db) {
                trace!(channel, band = ?band.bounds(), threshold_db, "no content in band");
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Returns true if no channel has content outside the bins covered by `bands`.
///
/// Any bin reaching `threshold_db` outside the union of the bands fails the channel.
/// Bands are allowed, not required, to carry content; a silent channel always passes.
///
/// # Errors
/// Returns [`crate::AudioTraitError::InvalidFrequencyRange`] if a band does not fit below
/// Nyquist at `sample_rate`, or [`crate::AudioTraitError::ChannelOutOfRange`] for a
/// channel the signal lacks.
pub fn has_signal_only_in_bands<S: Signal + ?Sized>(
    signal: &S,
    channels: &BTreeSet<usize>,
    bands: &FrequencySelection,
    sample_rate: f32,
    threshold_db: f32,
    analyzer: &FrequencyDomainAnalyzer,
) -> AudioTraitResult<bool> {
    let legal_bins = analyzer.bins_for_selection(bands, sample_rate)?;

    for &channel in channels {
        let spectrum = analyzer.normalized_bin_values_db(channel_samples(signal, channel)?)?;
        let outside = spectrum
            .iter()
            .enumerate()
            .find(|&(bin, &level)| level >= threshold_db && !legal_bins.contains(&bin));
        if let Some((bin, &level)) = outside {
            trace!(
                channel,
                bin,
                frequency = analyzer.bin_frequency(bin, sample_rate),
                level,
                "content outside the selected bands"
            );
            return Ok(false);
        }
    }
    Ok(true)
}

/// [`has_signal_only_in_bands`] for the single band `[1 Hz, frequency]`.
///
/// # Errors
/// Returns [`crate::AudioTraitError::InvalidFrequencyBand`] if `frequency <= 1`, plus the
/// errors of [`has_signal_only_in_bands`].
pub fn has_signal_only_below<S: Signal + ?Sized>(
    signal: &S,
    channels: &BTreeSet<usize>,
    frequency: f32,
    sample_rate: f32,
    threshold_db: f32,
    analyzer: &FrequencyDomainAnalyzer,
) -> AudioTraitResult<bool> {
    let bands = FrequencySelection::from(FreqBand::range(1.0, frequency)?);
    has_signal_only_in_bands(signal, channels, &bands, sample_rate, threshold_db, analyzer)
}

/// [`has_signal_only_in_bands`] for the single band `[frequency, Nyquist]`.
///
/// # Errors
/// Returns [`crate::AudioTraitError::InvalidParameter`] for a non-positive sample rate,
/// [`crate::AudioTraitError::InvalidFrequencyBand`] if `frequency` is not below Nyquist,
/// plus the errors of [`has_signal_only_in_bands`].
pub fn has_signal_only_above<S: Signal + ?Sized>(
    signal: &S,
    channels: &BTreeSet<usize>,
    frequency: f32,
    sample_rate: f32,
    threshold_db: f32,
    analyzer: &FrequencyDomainAnalyzer,
) -> AudioTraitResult<bool> {
    validate_sample_rate(sample_rate)?;
    let bands = FrequencySelection::from(FreqBand::range(frequency, sample_rate / 2.0)?);
    has_signal_only_in_bands(signal, channels, &bands, sample_rate, threshold_db, analyzer)
}
