//! Tolerance-aware audio trait predicates.
//!
//! Every predicate is available in two forms:
//!
//! - a free function in [`time_domain`] or [`frequency_domain`] that takes an already
//!   resolved set of 1-based channel numbers, and
//! - an [`AudioTrait`] variant evaluated through [`check`], which validates the signal
//!   and resolves a [`crate::ChannelSelection`] first.
//!
//! Channels are evaluated independently and combined with AND.
//!
//! # Examples
//! ```rust
//! use audio_traits::{check, AudioTrait, ChannelSelection, RawSignal};
//!
//! let left = [0.0f32, 0.5, -0.25];
//! let right = [0.0f32, 0.0, 0.0];
//! let signal = RawSignal::new(&[&left, &right]).unwrap();
//!
//! let presence = AudioTrait::has_signal_on_all_channels();
//! assert!(check(&signal, &ChannelSelection::from_items([1usize]).unwrap(), &presence).unwrap());
//! assert!(!check(&signal, &ChannelSelection::all(), &presence).unwrap());
//! ```

pub mod audio_trait;
pub mod frequency_domain;
pub mod time_domain;

pub use audio_trait::{AudioTrait, check};

use crate::{AudioTraitError, AudioTraitResult, Signal};

/// Default level a channel's peak must reach to count as "signal present".
pub const DEFAULT_PRESENCE_THRESHOLD_DB: f32 = -96.0;
/// Default level (relative to the loudest bin) a bin must reach to count as content.
pub const DEFAULT_BAND_THRESHOLD_DB: f32 = -0.5;
/// Exclusive upper bound of amplitude tolerances.
pub const MAX_AMPLITUDE_TOLERANCE_DB: f32 = 96.0;
/// Largest accepted time tolerance (jitter) of a delay check.
pub const MAX_TIME_TOLERANCE_SAMPLES: usize = 5;
/// Exclusive upper bound of `delay / num_samples` in a delay check.
pub const MAX_DELAY_RATIO: f32 = 0.8;

/// Samples of the 1-based `channel` of `signal`.
pub(crate) fn channel_samples<S: Signal + ?Sized>(signal: &S, channel: usize) -> AudioTraitResult<&[f32]> {
    let index = channel.checked_sub(1).ok_or_else(|| {
        AudioTraitError::InvalidChannelSelection("channel numbers start at 1".to_string())
    })?;
    signal.channel(index)
}

/// Checks `0 <= tolerance_db < MAX_AMPLITUDE_TOLERANCE_DB`.
pub(crate) fn validate_amplitude_tolerance(param: &'static str, tolerance_db: f32) -> AudioTraitResult<()> {
    if (0.0..MAX_AMPLITUDE_TOLERANCE_DB).contains(&tolerance_db) {
        Ok(())
    } else {
        Err(AudioTraitError::invalid_parameter(
            param,
            format!("must be in [0, {MAX_AMPLITUDE_TOLERANCE_DB}) dB, got {tolerance_db}"),
        ))
    }
}
