//! The [`AudioTrait`] dispatcher.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use super::{DEFAULT_BAND_THRESHOLD_DB, DEFAULT_PRESENCE_THRESHOLD_DB, frequency_domain, time_domain};
use crate::{
    AnalyzerConfig, AudioTraitError, AudioTraitResult, ChannelSelection, FrequencyDomainAnalyzer,
    FrequencySelection, Signal,
};

/// A property of a signal that can be checked with [`check`].
///
/// The constructor functions fill in the default thresholds and tolerances; the
/// `with_*` methods adjust them on the variants that have the parameter and leave
/// other variants unchanged.
#[derive(Clone, Copy)]
pub enum AudioTrait<'a> {
    /// Every channel's absolute peak reaches `threshold_db`.
    HasSignalOnAllChannels {
        /// Presence threshold in dBFS.
        threshold_db: f32,
    },
    /// Every channel has content in every band.
    HasSignalInAllBands {
        /// Bands that must carry content.
        bands: &'a FrequencySelection,
        /// Sample rate of the signal in Hz.
        sample_rate: f32,
        /// Bin threshold relative to the loudest bin.
        threshold_db: f32,
        /// Spectrum analysis settings.
        config: AnalyzerConfig,
    },
    /// No channel has content outside the bands.
    HasSignalOnlyInBands {
        /// Bands that may carry content.
        bands: &'a FrequencySelection,
        /// Sample rate of the signal in Hz.
        sample_rate: f32,
        /// Bin threshold relative to the loudest bin.
        threshold_db: f32,
        /// Spectrum analysis settings.
        config: AnalyzerConfig,
    },
    /// No channel has content above `frequency`.
    HasSignalOnlyBelow {
        /// Highest allowed frequency in Hz.
        frequency: f32,
        /// Sample rate of the signal in Hz.
        sample_rate: f32,
        /// Bin threshold relative to the loudest bin.
        threshold_db: f32,
        /// Spectrum analysis settings.
        config: AnalyzerConfig,
    },
    /// No channel has content below `frequency`.
    HasSignalOnlyAbove {
        /// Lowest allowed frequency in Hz.
        frequency: f32,
        /// Sample rate of the signal in Hz.
        sample_rate: f32,
        /// Bin threshold relative to the loudest bin.
        threshold_db: f32,
        /// Spectrum analysis settings.
        config: AnalyzerConfig,
    },
    /// Every channel is the same channel of `reference`, delayed.
    IsDelayedVersionOf {
        /// The undelayed signal.
        reference: &'a dyn Signal,
        /// Expected delay in samples.
        delay_samples: usize,
        /// Allowed per-sample level difference in dB.
        amplitude_tolerance_db: f32,
        /// Allowed deviation from `delay_samples`.
        time_tolerance_samples: usize,
    },
    /// Every channel matches the first selected channel.
    HasIdenticalChannels {
        /// Allowed per-sample level difference in dB.
        tolerance_db: f32,
    },
    /// Every channel matches the same channel of `other`.
    HaveIdenticalChannels {
        /// The signal to compare with.
        other: &'a dyn Signal,
        /// Allowed per-sample level difference in dB.
        tolerance_db: f32,
    },
}

impl<'a> AudioTrait<'a> {
    /// Signal presence with the default threshold (-96 dB).
    pub const fn has_signal_on_all_channels() -> Self {
        Self::HasSignalOnAllChannels {
            threshold_db: DEFAULT_PRESENCE_THRESHOLD_DB,
        }
    }

    /// Band presence with the default threshold (-0.5 dB) and analyzer settings.
    pub const fn has_signal_in_all_bands(bands: &'a FrequencySelection, sample_rate: f32) -> Self {
        Self::HasSignalInAllBands {
            bands,
            sample_rate,
            threshold_db: DEFAULT_BAND_THRESHOLD_DB,
            config: AnalyzerConfig::new(),
        }
    }

    /// Band exclusivity with the default threshold (-0.5 dB) and analyzer settings.
    pub const fn has_signal_only_in_bands(bands: &'a FrequencySelection, sample_rate: f32) -> Self {
        Self::HasSignalOnlyInBands {
            bands,
            sample_rate,
            threshold_db: DEFAULT_BAND_THRESHOLD_DB,
            config: AnalyzerConfig::new(),
        }
    }

    /// Content only in `[1 Hz, frequency]`.
    pub const fn has_signal_only_below(frequency: f32, sample_rate: f32) -> Self {
        Self::HasSignalOnlyBelow {
            frequency,
            sample_rate,
            threshold_db: DEFAULT_BAND_THRESHOLD_DB,
            config: AnalyzerConfig::new(),
        }
    }

    /// Content only in `[frequency, Nyquist]`.
    pub const fn has_signal_only_above(frequency: f32, sample_rate: f32) -> Self {
        Self::HasSignalOnlyAbove {
            frequency,
            sample_rate,
            threshold_db: DEFAULT_BAND_THRESHOLD_DB,
            config: AnalyzerConfig::new(),
        }
    }

    /// Exact delay match (no amplitude or time tolerance).
    pub const fn is_delayed_version_of(reference: &'a dyn Signal, delay_samples: usize) -> Self {
        Self::IsDelayedVersionOf {
            reference,
            delay_samples,
            amplitude_tolerance_db: 0.0,
            time_tolerance_samples: 0,
        }
    }

    /// Exact match between the selected channels.
    pub const fn has_identical_channels() -> Self {
        Self::HasIdenticalChannels { tolerance_db: 0.0 }
    }

    /// Exact match with the channels of `other`.
    pub const fn have_identical_channels(other: &'a dyn Signal) -> Self {
        Self::HaveIdenticalChannels {
            other,
            tolerance_db: 0.0,
        }
    }

    /// Sets the presence or bin threshold.
    pub const fn with_threshold_db(mut self, value: f32) -> Self {
        match &mut self {
            Self::HasSignalOnAllChannels { threshold_db }
            | Self::HasSignalInAllBands { threshold_db, .. }
            | Self::HasSignalOnlyInBands { threshold_db, .. }
            | Self::HasSignalOnlyBelow { threshold_db, .. }
            | Self::HasSignalOnlyAbove { threshold_db, .. } => *threshold_db = value,
            _ => {}
        }
        self
    }

    /// Sets the amplitude tolerance of the comparison-based traits.
    pub const fn with_tolerance_db(mut self, value: f32) -> Self {
        match &mut self {
            Self::IsDelayedVersionOf {
                amplitude_tolerance_db: tolerance_db,
                ..
            }
            | Self::HasIdenticalChannels { tolerance_db }
            | Self::HaveIdenticalChannels { tolerance_db, .. } => *tolerance_db = value,
            _ => {}
        }
        self
    }

    /// Sets the time tolerance of a delay check.
    pub const fn with_time_tolerance(mut self, samples: usize) -> Self {
        if let Self::IsDelayedVersionOf {
            time_tolerance_samples,
            ..
        } = &mut self
        {
            *time_tolerance_samples = samples;
        }
        self
    }

    /// Sets the analyzer settings of the spectral traits.
    pub const fn with_analyzer_config(mut self, value: AnalyzerConfig) -> Self {
        match &mut self {
            Self::HasSignalInAllBands { config, .. }
            | Self::HasSignalOnlyInBands { config, .. }
            | Self::HasSignalOnlyBelow { config, .. }
            | Self::HasSignalOnlyAbove { config, .. } => *config = value,
            _ => {}
        }
        self
    }

    /// Name of the trait, for diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HasSignalOnAllChannels { .. } => "HasSignalOnAllChannels",
            Self::HasSignalInAllBands { .. } => "HasSignalInAllBands",
            Self::HasSignalOnlyInBands { .. } => "HasSignalOnlyInBands",
            Self::HasSignalOnlyBelow { .. } => "HasSignalOnlyBelow",
            Self::HasSignalOnlyAbove { .. } => "HasSignalOnlyAbove",
            Self::IsDelayedVersionOf { .. } => "IsDelayedVersionOf",
            Self::HasIdenticalChannels { .. } => "HasIdenticalChannels",
            Self::HaveIdenticalChannels { .. } => "HaveIdenticalChannels",
        }
    }

    /// Evaluates the trait on an already resolved set of 1-based channels.
    ///
    /// # Errors
    /// Returns the error of the underlying predicate.
    pub fn eval<S: Signal + ?Sized>(&self, signal: &S, channels: &BTreeSet<usize>) -> AudioTraitResult<bool> {
        match *self {
            Self::HasSignalOnAllChannels { threshold_db } => {
                time_domain::has_signal_on_all_channels(signal, channels, threshold_db)
            }
            Self::HasSignalInAllBands {
                bands,
                sample_rate,
                threshold_db,
                config,
            } => {
                let analyzer = FrequencyDomainAnalyzer::new(config)?;
                frequency_domain::has_signal_in_all_bands(
                    signal,
                    channels,
                    bands,
                    sample_rate,
                    threshold_db,
                    &analyzer,
                )
            }
            Self::HasSignalOnlyInBands {
                bands,
                sample_rate,
                threshold_db,
                config,
            } => {
                let analyzer = FrequencyDomainAnalyzer::new(config)?;
                frequency_domain::has_signal_only_in_bands(
                    signal,
                    channels,
                    bands,
                    sample_rate,
                    threshold_db,
                    &analyzer,
                )
            }
            Self::HasSignalOnlyBelow {
                frequency,
                sample_rate,
                threshold_db,
                config,
            } => {
                let analyzer = FrequencyDomainAnalyzer::new(config)?;
                frequency_domain::has_signal_only_below(
                    signal,
                    channels,
                    frequency,
                    sample_rate,
                    threshold_db,
                    &analyzer,
                )
            }
            Self::HasSignalOnlyAbove {
                frequency,
                sample_rate,
                threshold_db,
                config,
            } => {
                let analyzer = FrequencyDomainAnalyzer::new(config)?;
                frequency_domain::has_signal_only_above(
                    signal,
                    channels,
                    frequency,
                    sample_rate,
                    threshold_db,
                    &analyzer,
                )
            }
            Self::IsDelayedVersionOf {
                reference,
                delay_samples,
                amplitude_tolerance_db,
                time_tolerance_samples,
            } => time_domain::is_delayed_version_of(
                signal,
                channels,
                reference,
                delay_samples,
                amplitude_tolerance_db,
                time_tolerance_samples,
            ),
            Self::HasIdenticalChannels { tolerance_db } => {
                time_domain::has_identical_channels(signal, channels, tolerance_db)
            }
            Self::HaveIdenticalChannels { other, tolerance_db } => {
                time_domain::have_identical_channels(signal, channels, other, tolerance_db)
            }
        }
    }
}

impl fmt::Debug for AudioTrait<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HasSignalOnAllChannels { threshold_db } => f
                .debug_struct(self.name())
                .field("threshold_db", threshold_db)
                .finish(),
            Self::HasSignalInAllBands {
                bands,
                sample_rate,
                threshold_db,
                config,
            }
            | Self::HasSignalOnlyInBands {
                bands,
                sample_rate,
                threshold_db,
                config,
            } => f
                .debug_struct(self.name())
                .field("bands", &bands.bounds())
                .field("sample_rate", sample_rate)
                .field("threshold_db", threshold_db)
                .field("config", config)
                .finish(),
            Self::HasSignalOnlyBelow {
                frequency,
                sample_rate,
                threshold_db,
                config,
            }
            | Self::HasSignalOnlyAbove {
                frequency,
                sample_rate,
                threshold_db,
                config,
            } => f
                .debug_struct(self.name())
                .field("frequency", frequency)
                .field("sample_rate", sample_rate)
                .field("threshold_db", threshold_db)
                .field("config", config)
                .finish(),
            Self::IsDelayedVersionOf {
                reference,
                delay_samples,
                amplitude_tolerance_db,
                time_tolerance_samples,
            } => f
                .debug_struct(self.name())
                .field("reference_channels", &reference.num_channels())
                .field("reference_samples", &reference.num_samples())
                .field("delay_samples", delay_samples)
                .field("amplitude_tolerance_db", amplitude_tolerance_db)
                .field("time_tolerance_samples", time_tolerance_samples)
                .finish(),
            Self::HasIdenticalChannels { tolerance_db } => f
                .debug_struct(self.name())
                .field("tolerance_db", tolerance_db)
                .finish(),
            Self::HaveIdenticalChannels { other, tolerance_db } => f
                .debug_struct(self.name())
                .field("other_channels", &other.num_channels())
                .field("other_samples", &other.num_samples())
                .field("tolerance_db", tolerance_db)
                .finish(),
        }
    }
}

/// Checks `audio_trait` on the channels of `signal` picked by `selection`.
///
/// The empty selection stands for all channels.
///
/// # Errors
/// - [`AudioTraitError::InvalidSignal`] if the signal has no samples.
/// - [`AudioTraitError::ChannelOutOfRange`] if the selection names a missing channel.
/// - Any error of the evaluated predicate.
///
/// # Examples
/// ```rust
/// use audio_traits::{check, AudioTrait, ChannelSelection, Freqs, MatrixSignal};
///
/// let sample_rate = 48_000.0;
/// let tone: Vec<f32> = (0..48_000)
///     .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / sample_rate).sin())
///     .collect();
/// let signal = MatrixSignal::from_channels(vec![tone]).unwrap();
///
/// let around_1k = Freqs::new().with_range(900.0, 1100.0).unwrap();
/// let only = AudioTrait::has_signal_only_in_bands(&around_1k, sample_rate);
/// assert!(check(&signal, &ChannelSelection::all(), &only).unwrap());
/// ```
pub fn check<S: Signal + ?Sized>(
    signal: &S,
    selection: &ChannelSelection,
    audio_trait: &AudioTrait<'_>,
) -> AudioTraitResult<bool> {
    if signal.num_samples() == 0 {
        return Err(AudioTraitError::InvalidSignal(
            "signal must contain at least one sample".to_string(),
        ));
    }

    let channels = selection.resolve(signal)?;
    let result = audio_trait.eval(signal, &channels)?;
    debug!(check = audio_trait.name(), ?channels, result, "evaluated audio trait");
    Ok(result)
}
