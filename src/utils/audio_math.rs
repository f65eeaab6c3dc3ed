//! Level conversions and small numeric helpers.
//!
//! All analysis in this crate runs in single precision, so the helpers here are
//! `f32`-only.
//!
//! # Examples
//!
//! ```rust
//! use audio_traits::audio_math::{db_to_linear, linear_to_db, SILENCE_DB};
//!
//! let half = db_to_linear(-6.0206); // ≈ 0.5
//! let db = linear_to_db(0.5); // ≈ -6.02 dB
//! assert_eq!(linear_to_db(0.0), SILENCE_DB);
//! ```

/// Level reported for zero (or negative) linear values instead of `-inf`.
pub const SILENCE_DB: f32 = f32::MIN;

/// Converts a level in decibels to a linear amplitude factor.
///
/// Uses the formula `linear = 10^(dB / 20)`.
pub fn db_to_linear(value_db: f32) -> f32 {
    10.0f32.powf(value_db / 20.0)
}

/// Converts a linear amplitude to decibels.
///
/// Uses the formula `dB = 20 * log10(linear)`. Values `<= 0` (and NaN) map to
/// [`SILENCE_DB`], so callers can compare against thresholds without special-casing
/// `-inf`.
pub fn linear_to_db(value_linear: f32) -> f32 {
    if value_linear > 0.0 {
        20.0 * value_linear.log10()
    } else {
        SILENCE_DB
    }
}

/// Returns true if `value` is a non-zero power of two.
pub const fn is_power_of_two(value: usize) -> bool {
    value != 0 && (value & (value - 1)) == 0
}

/// Rounds `value` up to the next power of two (`0` and `1` both round to `1`).
///
/// Returns `None` if the result would overflow `usize`.
pub const fn next_power_of_two(value: usize) -> Option<usize> {
    value.checked_next_power_of_two()
}
