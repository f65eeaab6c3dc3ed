//! Sample-by-sample comparison of audio buffers.
//!
//! Buffers are compared in the level domain: two samples match when their absolute
//! values, expressed in dB, differ by no more than the given tolerance. Polarity is
//! ignored and two exact zeros always match.

use crate::utils::audio_math::linear_to_db;
use crate::{AudioTraitError, AudioTraitResult};

/// Returns true if two samples agree within `tolerance_db`.
///
/// Both values are converted with `20·log10(|x|)`; zero maps to the silence sentinel,
/// so a zero only ever matches another zero.
pub fn samples_match_db(a: f32, b: f32, tolerance_db: f32) -> bool {
    let error = (linear_to_db(a.abs()) - linear_to_db(b.abs())).abs();
    error <= tolerance_db
}

/// Compares two buffers sample by sample using [`samples_match_db`].
///
/// # Errors
/// Returns [`AudioTraitError::SizeMismatch`] if the buffers have different lengths.
pub fn buffers_match_db(a: &[f32], b: &[f32], tolerance_db: f32) -> AudioTraitResult<bool> {
    if a.len() != b.len() {
        return Err(AudioTraitError::size_mismatch(format!(
            "buffers must be of equal length for comparison ({} vs {})",
            a.len(),
            b.len()
        )));
    }

    Ok(a
        .iter()
        .zip(b.iter())
        .all(|(&x, &y)| samples_match_db(x, y, tolerance_db)))
}
