//! Predicates evaluated directly on the samples.

use std::collections::BTreeSet;

use tracing::trace;

use super::{
    MAX_DELAY_RATIO, MAX_TIME_TOLERANCE_SAMPLES, channel_samples, validate_amplitude_tolerance,
};
use crate::utils::audio_math::db_to_linear;
use crate::utils::comparison::buffers_match_db;
use crate::{AudioTraitError, AudioTraitResult, Signal};

/// Returns true if the absolute peak of every channel reaches `threshold_db`.
///
/// # Errors
/// Returns [`AudioTraitError::ChannelOutOfRange`] for a channel the signal lacks.
pub fn has_signal_on_all_channels<S: Signal + ?Sized>(
    signal: &S,
    channels: &BTreeSet<usize>,
    threshold_db: f32,
) -> AudioTraitResult<bool> {
    let threshold = db_to_linear(threshold_db);
    for &channel in channels {
        let peak = channel_samples(signal, channel)?
            .iter()
            .fold(0.0f32, |peak, sample| peak.max(sample.abs()));
        if peak < threshold {
            trace!(channel, peak, threshold, "channel below presence threshold");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Returns true if every channel of `signal` is `reference` delayed by `delay_samples`.
///
/// Each candidate delay `d` in `delay ± time_tolerance_samples` is tried in turn. For
/// `d >= 0` the reference is shifted right by `d` samples; a negative `d` (possible
/// when the tolerance exceeds the delay) shifts the signal itself instead. The shifted
/// copy is zero-filled or truncated to the signal length and compared sample by sample
/// within `amplitude_tolerance_db`. A channel passes if any candidate matches.
///
/// # Errors
/// - [`AudioTraitError::InvalidParameter`] if `amplitude_tolerance_db` is outside `[0, 96)`,
///   the time tolerance exceeds [`MAX_TIME_TOLERANCE_SAMPLES`], or the delay is not
///   shorter than [`MAX_DELAY_RATIO`] of the signal.
/// - [`AudioTraitError::ReferenceTooShort`] if the reference has fewer than
///   `num_samples - delay_samples` samples.
/// - [`AudioTraitError::ChannelOutOfRange`] if either signal lacks a selected channel.
pub fn is_delayed_version_of<S, R>(
    signal: &S,
    channels: &BTreeSet<usize>,
    reference: &R,
    delay_samples: usize,
    amplitude_tolerance_db: f32,
    time_tolerance_samples: usize,
) -> AudioTraitResult<bool>
where
    S: Signal + ?Sized,
    R: Signal + ?Sized,
{
    validate_amplitude_tolerance("amplitude_tolerance_db", amplitude_tolerance_db)?;
    if time_tolerance_samples > MAX_TIME_TOLERANCE_SAMPLES {
        return Err(AudioTraitError::invalid_parameter(
            "time_tolerance_samples",
            format!("must be at most {MAX_TIME_TOLERANCE_SAMPLES}, got {time_tolerance_samples}"),
        ));
    }

    let num_samples = signal.num_samples();
    let ratio = delay_samples as f32 / num_samples as f32;
    if ratio.is_nan() || ratio >= MAX_DELAY_RATIO {
        return Err(AudioTraitError::invalid_parameter(
            "delay_samples",
            format!(
                "{delay_samples} samples exceeds {}% of the {num_samples}-sample signal",
                MAX_DELAY_RATIO * 100.0
            ),
        ));
    }

    let required = num_samples.saturating_sub(delay_samples);
    if reference.num_samples() < required {
        return Err(AudioTraitError::ReferenceTooShort {
            required,
            actual: reference.num_samples(),
        });
    }

    let delay = delay_samples as isize;
    let jitter = time_tolerance_samples as isize;
    for &channel in channels {
        let samples = channel_samples(signal, channel)?;
        let reference_samples = channel_samples(reference, channel)?;

        let mut matched = None;
        for candidate in (delay - jitter)..=(delay + jitter) {
            let source = if candidate < 0 { samples } else { reference_samples };
            let shifted = delayed_copy(source, candidate.unsigned_abs(), samples.len());
            if buffers_match_db(samples, &shifted, amplitude_tolerance_db)? {
                matched = Some(candidate);
                break;
            }
        }

        match matched {
            Some(candidate) => trace!(channel, candidate, "delayed copy matched"),
            None => {
                trace!(channel, delay_samples, time_tolerance_samples, "no delayed copy matched");
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Returns true if every selected channel matches the first selected channel within
/// `tolerance_db`.
///
/// An empty or single-channel selection is trivially identical.
///
/// # Errors
/// Returns [`AudioTraitError::InvalidParameter`] if `tolerance_db` is outside `[0, 96)`, or
/// [`AudioTraitError::ChannelOutOfRange`] for a channel the signal lacks.
pub fn has_identical_channels<S: Signal + ?Sized>(
    signal: &S,
    channels: &BTreeSet<usize>,
    tolerance_db: f32,
) -> AudioTraitResult<bool> {
    validate_amplitude_tolerance("tolerance_db", tolerance_db)?;

    let mut remaining = channels.iter();
    let Some(&first) = remaining.next() else {
        return Ok(true);
    };
    let reference = channel_samples(signal, first)?;

    for &channel in remaining {
        if !buffers_match_db(channel_samples(signal, channel)?, reference, tolerance_db)? {
            trace!(channel, reference = first, "channel differs from reference channel");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Returns true if each selected channel of `signal` matches the same channel of
/// `other` within `tolerance_db`.
///
/// # Errors
/// - [`AudioTraitError::InvalidParameter`] if `tolerance_db` is outside `[0, 96)`.
/// - [`AudioTraitError::ChannelOutOfRange`] if either signal lacks a selected channel.
/// - [`AudioTraitError::SizeMismatch`] if the signals differ in length.
pub fn have_identical_channels<S, O>(
    signal: &S,
    channels: &BTreeSet<usize>,
    other: &O,
    tolerance_db: f32,
) -> AudioTraitResult<bool>
where
    S: Signal + ?Sized,
    O: Signal + ?Sized,
{
    validate_amplitude_tolerance("tolerance_db", tolerance_db)?;

    for &channel in channels {
        let a = channel_samples(signal, channel)?;
        let b = channel_samples(other, channel)?;
        if !buffers_match_db(a, b, tolerance_db)? {
            trace!(channel, "channels of the two signals differ");
            return Ok(false);
        }
    }
    Ok(true)
}

/// `source` shifted right by `delay` samples, zero-filled or truncated to `len`.
fn delayed_copy(source: &[f32], delay: usize, len: usize) -> Vec<f32> {
    let mut shifted = vec![0.0f32; len];
    if delay < len {
        let count = (len - delay).min(source.len());
        shifted[delay..delay + count].copy_from_slice(&source[..count]);
    }
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatrixSignal, RawSignal};

    fn all(num_channels: usize) -> BTreeSet<usize> {
        (1..=num_channels).collect()
    }

    fn dirac(len: usize, position: usize) -> Vec<f32> {
        let mut samples = vec![0.0f32; len];
        samples[position] = 1.0;
        samples
    }

    fn sine(len: usize, gain: f32) -> Vec<f32> {
        (0..len)
            .map(|i| gain * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48_000.0).sin())
            .collect()
    }

    #[test]
    fn test_delayed_copy() {
        assert_eq!(delayed_copy(&[1.0, 2.0, 3.0], 1, 3), vec![0.0, 1.0, 2.0]);
        assert_eq!(delayed_copy(&[1.0, 2.0, 3.0], 0, 4), vec![1.0, 2.0, 3.0, 0.0]);
        assert_eq!(delayed_copy(&[1.0, 2.0], 5, 3), vec![0.0, 0.0, 0.0]);
        assert_eq!(delayed_copy(&[1.0, 2.0, 3.0, 4.0], 2, 3), vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_signal_presence() {
        let silent = vec![0.0f32; 512];
        let quiet = sine(512, db_to_linear(-50.0));
        let negative = vec![-0.5f32; 512];
        let signal = RawSignal::new(&[&quiet, &silent, &negative]).unwrap();

        let first: BTreeSet<usize> = [1].into_iter().collect();
        let third: BTreeSet<usize> = [3].into_iter().collect();
        assert!(has_signal_on_all_channels(&signal, &first, -96.0).unwrap());
        assert!(!has_signal_on_all_channels(&signal, &first, -40.0).unwrap());
        assert!(has_signal_on_all_channels(&signal, &third, -6.5).unwrap());
        assert!(!has_signal_on_all_channels(&signal, &all(3), -96.0).unwrap());
        assert!(has_signal_on_all_channels(&signal, &BTreeSet::new(), 0.0).unwrap());
    }

    #[test]
    fn test_signal_presence_out_of_range_channel() {
        let samples = vec![0.5f32; 16];
        let signal = RawSignal::mono(&samples);
        assert!(has_signal_on_all_channels(&signal, &all(2), -96.0).is_err());
    }

    #[test]
    fn test_dirac_delay() {
        let reference = dirac(1000, 100);
        let delayed = dirac(1000, 150);
        let reference = RawSignal::mono(&reference);
        let signal = RawSignal::mono(&delayed);
        let channels = all(1);

        assert!(is_delayed_version_of(&signal, &channels, &reference, 50, 0.0, 0).unwrap());
        assert!(!is_delayed_version_of(&signal, &channels, &reference, 49, 0.0, 0).unwrap());
        assert!(!is_delayed_version_of(&signal, &channels, &reference, 51, 0.0, 0).unwrap());
        assert!(is_delayed_version_of(&signal, &channels, &reference, 49, 0.0, 1).unwrap());
        assert!(is_delayed_version_of(&signal, &channels, &reference, 51, 0.0, 1).unwrap());
        assert!(!is_delayed_version_of(&signal, &channels, &reference, 53, 0.0, 2).unwrap());
        assert!(is_delayed_version_of(&signal, &channels, &reference, 55, 0.0, 5).unwrap());
    }

    #[test]
    fn test_delay_with_amplitude_tolerance() {
        let reference = sine(2000, 0.8);
        let gain = db_to_linear(-1.0);
        let mut delayed = vec![0.0f32; 10];
        delayed.extend(reference.iter().take(1990).map(|x| x * gain));

        let reference = RawSignal::mono(&reference);
        let signal = RawSignal::mono(&delayed);
        let channels = all(1);

        assert!(!is_delayed_version_of(&signal, &channels, &reference, 10, 0.5, 0).unwrap());
        assert!(is_delayed_version_of(&signal, &channels, &reference, 10, 1.5, 0).unwrap());
    }

    #[test]
    fn test_delay_is_checked_per_channel() {
        let reference = MatrixSignal::from_channels(vec![dirac(100, 0), dirac(100, 10)]).unwrap();
        let signal = MatrixSignal::from_channels(vec![dirac(100, 5), dirac(100, 16)]).unwrap();

        let first: BTreeSet<usize> = [1].into_iter().collect();
        assert!(is_delayed_version_of(&signal, &first, &reference, 5, 0.0, 0).unwrap());
        assert!(!is_delayed_version_of(&signal, &all(2), &reference, 5, 0.0, 0).unwrap());
        assert!(is_delayed_version_of(&signal, &all(2), &reference, 5, 0.0, 1).unwrap());
    }

    #[test]
    fn test_negative_candidates_shift_the_signal_itself() {
        let silent = vec![0.0f32; 100];
        let reference = dirac(100, 0);
        let signal = RawSignal::mono(&silent);
        let reference = RawSignal::mono(&reference);

        // delay 0 with jitter 1 also tries -1, which compares the signal with itself
        assert!(!is_delayed_version_of(&signal, &all(1), &reference, 0, 0.0, 0).unwrap());
        assert!(is_delayed_version_of(&signal, &all(1), &reference, 0, 0.0, 1).unwrap());
    }

    #[test]
    fn test_delay_parameter_validation() {
        let samples = dirac(1000, 0);
        let signal = RawSignal::mono(&samples);
        let channels = all(1);

        let invalid = |delay, tolerance, jitter| {
            matches!(
                is_delayed_version_of(&signal, &channels, &signal, delay, tolerance, jitter),
                Err(AudioTraitError::InvalidParameter { .. })
            )
        };
        assert!(invalid(0, 96.0, 0));
        assert!(invalid(0, -1.0, 0));
        assert!(invalid(0, 0.0, 6));
        assert!(invalid(800, 0.0, 0));
        assert!(invalid(5000, 0.0, 0));
        assert!(!invalid(799, 0.0, 5));
    }

    #[test]
    fn test_reference_too_short() {
        let samples = vec![0.0f32; 1000];
        let short = vec![0.0f32; 899];
        let exact = vec![0.0f32; 900];
        let signal = RawSignal::mono(&samples);
        let channels = all(1);

        assert_eq!(
            is_delayed_version_of(&signal, &channels, &RawSignal::mono(&short), 100, 0.0, 0),
            Err(AudioTraitError::ReferenceTooShort {
                required: 900,
                actual: 899
            })
        );
        assert!(is_delayed_version_of(&signal, &channels, &RawSignal::mono(&exact), 100, 0.0, 0).unwrap());
    }

    #[test]
    fn test_identical_channels() {
        let a = sine(256, 0.5);
        let b: Vec<f32> = a.iter().map(|x| -x).collect();
        let c = sine(256, 0.25);
        let signal = RawSignal::new(&[&a, &b, &c, &a]).unwrap();

        let pick = |channels: &[usize]| channels.iter().copied().collect::<BTreeSet<usize>>();
        assert!(has_identical_channels(&signal, &pick(&[1, 2, 4]), 0.0).unwrap());
        assert!(!has_identical_channels(&signal, &pick(&[1, 3]), 0.0).unwrap());
        assert!(has_identical_channels(&signal, &pick(&[1, 3]), 6.1).unwrap());
        assert!(has_identical_channels(&signal, &pick(&[3]), 0.0).unwrap());
        assert!(has_identical_channels(&signal, &BTreeSet::new(), 0.0).unwrap());
    }

    #[test]
    fn test_identical_channels_combines_every_comparison() {
        // channel 3 differs, channel 4 matches again: the mismatch must not be forgotten
        let a = sine(128, 0.5);
        let c = sine(128, 0.1);
        let signal = RawSignal::new(&[&a, &a, &c, &a]).unwrap();
        assert!(!has_identical_channels(&signal, &all(4), 0.0).unwrap());
    }

    #[test]
    fn test_identical_channels_tolerance_validation() {
        let a = vec![0.0f32; 8];
        let signal = RawSignal::mono(&a);
        assert!(has_identical_channels(&signal, &all(1), 96.0).is_err());
        assert!(have_identical_channels(&signal, &all(1), &signal, -0.5).is_err());
    }

    #[test]
    fn test_two_signals_with_identical_channels() {
        let left = sine(300, 0.7);
        let right = sine(300, 0.3);
        let signal = MatrixSignal::from_channels(vec![left.clone(), right.clone()]).unwrap();
        let same = RawSignal::new(&[&left, &right]).unwrap();
        let swapped = RawSignal::new(&[&right, &left]).unwrap();
        let first: BTreeSet<usize> = [1].into_iter().collect();

        assert!(have_identical_channels(&signal, &all(2), &same, 0.0).unwrap());
        assert!(!have_identical_channels(&signal, &all(2), &swapped, 0.0).unwrap());
        assert!(have_identical_channels(&signal, &all(2), &swapped, 7.5).unwrap());

        let mono = RawSignal::mono(&left);
        assert!(have_identical_channels(&signal, &first, &mono, 0.0).unwrap());
        assert!(matches!(
            have_identical_channels(&signal, &all(2), &mono, 0.0),
            Err(AudioTraitError::ChannelOutOfRange { .. })
        ));

        let shorter = &left[..299];
        assert!(matches!(
            have_identical_channels(&signal, &first, &RawSignal::mono(shorter), 0.0),
            Err(AudioTraitError::SizeMismatch(_))
        ));
    }
}
