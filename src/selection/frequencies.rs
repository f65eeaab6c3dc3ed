//! Frequency selections.
//!
//! A [`FreqBand`] is either a closed interval `[lower, upper]` in Hz or a single
//! discrete frequency (`lower == upper`). Only the shape of a band is validated here;
//! whether it fits below Nyquist depends on the sample rate and is checked when the
//! band is mapped to FFT bins.

use std::cmp::Ordering;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::{AudioTraitError, AudioTraitResult};

/// A frequency band in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct FreqBand {
    lower: f32,
    upper: f32,
}

impl FreqBand {
    /// Creates a band covering the single frequency `frequency`.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidFrequencyBand`] if `frequency` is not a
    /// finite value greater than zero.
    pub fn discrete(frequency: f32) -> AudioTraitResult<Self> {
        validate_lower(frequency)?;
        Ok(Self {
            lower: frequency,
            upper: frequency,
        })
    }

    /// Creates a band covering `[lower, upper]`.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidFrequencyBand`] if `lower <= 0` or `upper <= lower`.
    pub fn range(lower: f32, upper: f32) -> AudioTraitResult<Self> {
        validate_lower(lower)?;
        if !upper.is_finite() || upper <= lower {
            return Err(AudioTraitError::InvalidFrequencyBand(format!(
                "upper bound {upper} Hz must be greater than lower bound {lower} Hz"
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Returns `(lower, upper)` in Hz.
    pub const fn bounds(&self) -> (f32, f32) {
        (self.lower, self.upper)
    }

    /// Lower edge in Hz.
    pub const fn lower(&self) -> f32 {
        self.lower
    }

    /// Upper edge in Hz.
    pub const fn upper(&self) -> f32 {
        self.upper
    }

    /// Bandwidth in Hz (zero for a discrete frequency).
    pub fn width(&self) -> f32 {
        self.upper - self.lower
    }

    /// Arithmetic centre of the band in Hz.
    pub fn center_frequency(&self) -> f32 {
        (self.lower + self.upper) / 2.0
    }

    /// Returns true if the band is a single frequency.
    pub fn is_discrete(&self) -> bool {
        self.lower == self.upper
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.lower
            .total_cmp(&other.lower)
            .then(self.upper.total_cmp(&other.upper))
    }
}

fn validate_lower(lower: f32) -> AudioTraitResult<()> {
    if lower.is_finite() && lower > 0.0 {
        Ok(())
    } else {
        Err(AudioTraitError::InvalidFrequencyBand(format!(
            "lower bound must be greater than 0 Hz, got {lower}"
        )))
    }
}

/// A deduplicated set of [`FreqBand`]s, kept sorted by `(lower, upper)`.
///
/// # Examples
/// ```rust
/// use audio_traits::{FreqBand, Freqs};
///
/// let freqs = Freqs::from_bands([
///     FreqBand::range(20.0, 200.0).unwrap(),
///     FreqBand::discrete(1000.0).unwrap(),
///     FreqBand::range(20.0, 200.0).unwrap(),
/// ]);
/// assert_eq!(freqs.len(), 2);
/// assert_eq!(freqs.bounds(), vec![(20.0, 200.0), (1000.0, 1000.0)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencySelection {
    bands: Vec<FreqBand>,
}

/// Short name for [`FrequencySelection`].
pub type Freqs = FrequencySelection;

impl FrequencySelection {
    /// Creates an empty selection.
    pub const fn new() -> Self {
        Self { bands: Vec::new() }
    }

    /// Builds a selection from already validated bands, dropping duplicates.
    pub fn from_bands<I: IntoIterator<Item = FreqBand>>(bands: I) -> Self {
        bands.into_iter().fold(Self::new(), Self::with_band)
    }

    /// Builds a selection of discrete frequencies.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidFrequencyBand`] for any non-positive frequency.
    pub fn from_frequencies<I: IntoIterator<Item = f32>>(frequencies: I) -> AudioTraitResult<Self> {
        frequencies
            .into_iter()
            .try_fold(Self::new(), |selection, f| -> AudioTraitResult<Self> {
                Ok(selection.with_band(FreqBand::discrete(f)?))
            })
    }

    /// Adds a band; a band equal to one already present is ignored.
    pub fn with_band(mut self, band: FreqBand) -> Self {
        if let Err(position) = self.bands.binary_search_by(|b| b.total_cmp(&band)) {
            self.bands.insert(position, band);
        }
        self
    }

    /// Adds a discrete frequency.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidFrequencyBand`] if the frequency is not positive.
    pub fn with_frequency(self, frequency: f32) -> AudioTraitResult<Self> {
        Ok(self.with_band(FreqBand::discrete(frequency)?))
    }

    /// Adds a range `[lower, upper]`.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidFrequencyBand`] if the range is malformed.
    pub fn with_range(self, lower: f32, upper: f32) -> AudioTraitResult<Self> {
        Ok(self.with_band(FreqBand::range(lower, upper)?))
    }

    /// The stored bands in ascending order.
    pub fn bands(&self) -> &[FreqBand] {
        &self.bands
    }

    /// The `(lower, upper)` pairs of all stored bands.
    pub fn bounds(&self) -> Vec<(f32, f32)> {
        self.bands.iter().map(FreqBand::bounds).collect()
    }

    /// Number of distinct bands.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Returns true if no band was added.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

impl From<FreqBand> for FrequencySelection {
    fn from(band: FreqBand) -> Self {
        Self::new().with_band(band)
    }
}
