//! Real-valued FFT built on a mixed radix-4/radix-2 complex transform.
//!
//! A length-`N` real signal is packed into `N/2` complex values (`z[k] = x[2k] + i·x[2k+1]`),
//! transformed with an in-place decimation-in-frequency network, and "split" back into
//! the spectrum of the real signal using two precomputed coefficient tables. The inverse
//! runs the same steps backwards.
//!
//! Only power-of-two lengths are supported. The complex length `M = N/2` must lie in
//! `8..=16384`; an even `log2(M)` finishes with a radix-4 stage, an odd one with radix-2.
//!
//! # Examples
//!
//! ```rust
//! use audio_traits::RealValuedFft;
//!
//! let fft = RealValuedFft::new(16).unwrap();
//! let mut impulse = vec![0.0f32; 16];
//! impulse[0] = 1.0;
//!
//! let bins = fft.forward(&impulse).unwrap();
//! assert_eq!(bins.len(), 9);
//! assert!(bins.iter().all(|b| (b.norm() - 1.0).abs() < 1e-6));
//!
//! let restored = fft.inverse(&bins).unwrap();
//! assert!((restored[0] - 1.0).abs() < 1e-6);
//! ```

use std::f64::consts::PI;

use num_complex::Complex;
use num_traits::Zero;
use tracing::debug;

use crate::utils::audio_math::next_power_of_two;
use crate::{AudioTraitError, AudioTraitResult};

/// Smallest supported complex transform length.
const MIN_POINTS: usize = 8;
/// `log2` of the largest supported complex transform length.
const MAX_POINTS_LOG2: u32 = 14;
/// Largest supported complex transform length.
const MAX_POINTS: usize = 1 << MAX_POINTS_LOG2;

/// Smallest real transform length accepted by [`RealValuedFft::new`].
pub const MIN_FFT_LENGTH: usize = 2 * MIN_POINTS;
/// Largest real transform length accepted by [`RealValuedFft::new`].
pub const MAX_FFT_LENGTH: usize = 2 * MAX_POINTS;

/// 6-bit reversal of the table index; two lookups reverse a 12-bit group number.
const BIT_REVERSAL_TABLE: [u8; 64] = [
    0x00, 0x20, 0x10, 0x30, 0x08, 0x28, 0x18, 0x38, 0x04, 0x24, 0x14, 0x34, 0x0c, 0x2c, 0x1c, 0x3c,
    0x02, 0x22, 0x12, 0x32, 0x0a, 0x2a, 0x1a, 0x3a, 0x06, 0x26, 0x16, 0x36, 0x0e, 0x2e, 0x1e, 0x3e,
    0x01, 0x21, 0x11, 0x31, 0x09, 0x29, 0x19, 0x39, 0x05, 0x25, 0x15, 0x35, 0x0d, 0x2d, 0x1d, 0x3d,
    0x03, 0x23, 0x13, 0x33, 0x0b, 0x2b, 0x1b, 0x3b, 0x07, 0x27, 0x17, 0x37, 0x0f, 0x2f, 0x1f, 0x3f,
];

/// Size of the last butterfly stage of the complex transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    /// Final stage combines pairs (odd `log2` of the complex length).
    Two,
    /// Final stage combines quadruples (even `log2` of the complex length).
    Four,
}

impl Radix {
    /// Number of inputs combined by one butterfly of this radix.
    pub const fn value(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    const fn for_points(points: usize) -> Self {
        if points.trailing_zeros() % 2 == 0 {
            Self::Four
        } else {
            Self::Two
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    /// Twiddles are stored for the inverse transform; the forward one uses their conjugates.
    fn orient(self, twiddle: Complex<f32>) -> Complex<f32> {
        match self {
            Self::Forward => twiddle.conj(),
            Self::Inverse => twiddle,
        }
    }

    /// Multiplies by `-i` (forward) or `+i` (inverse).
    fn rotate(self, value: Complex<f32>) -> Complex<f32> {
        match self {
            Self::Forward => Complex::new(value.im, -value.re),
            Self::Inverse => Complex::new(-value.im, value.re),
        }
    }
}

/// A real-input FFT of fixed length with precomputed coefficient tables.
///
/// The engine is immutable after construction, so one instance can serve any number
/// of forward and inverse transforms, including from several threads at once.
#[derive(Debug, Clone)]
pub struct RealValuedFft {
    fft_length: usize,
    radix: Radix,
    twiddles: Vec<Complex<f32>>,
    split_a: Vec<Complex<f32>>,
    split_b: Vec<Complex<f32>>,
}

impl RealValuedFft {
    /// Creates an engine for `requested_length`, rounded up to the next power of two.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::UnsupportedLength`] if the rounded length is outside
    /// [`MIN_FFT_LENGTH`]`..=`[`MAX_FFT_LENGTH`].
    pub fn new(requested_length: usize) -> AudioTraitResult<Self> {
        let unsupported = |fft_length| AudioTraitError::UnsupportedLength {
            requested: requested_length,
            fft_length,
        };
        let fft_length = next_power_of_two(requested_length).ok_or_else(|| unsupported(0))?;
        let points = fft_length / 2;
        if !(MIN_POINTS..=MAX_POINTS).contains(&points) {
            return Err(unsupported(fft_length));
        }

        let radix = Radix::for_points(points);
        let (split_a, split_b) = split_tables(fft_length);
        debug!(requested_length, fft_length, ?radix, "created real-valued FFT");

        Ok(Self {
            fft_length,
            radix,
            twiddles: twiddle_table(points),
            split_a,
            split_b,
        })
    }

    /// Length `N` of the real input.
    pub const fn fft_length(&self) -> usize {
        self.fft_length
    }

    /// Number of bins returned by [`RealValuedFft::forward`] (`N/2 + 1`).
    pub const fn num_bins(&self) -> usize {
        self.fft_length / 2 + 1
    }

    /// Radix of the final butterfly stage.
    pub const fn radix(&self) -> Radix {
        self.radix
    }

    /// Computes the spectrum of `input`, DC through Nyquist (`N/2 + 1` bins).
    ///
    /// Only the first `N` samples are used.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidInputLength`] if `input` has fewer than `N` samples.
    pub fn forward(&self, input: &[f32]) -> AudioTraitResult<Vec<Complex<f32>>> {
        if input.len() < self.fft_length {
            return Err(AudioTraitError::InvalidInputLength {
                expected: self.fft_length,
                actual: input.len(),
            });
        }

        let mut packed: Vec<Complex<f32>> = input[..self.fft_length]
            .chunks_exact(2)
            .map(|pair| Complex::new(pair[0], pair[1]))
            .collect();
        let spectrum = self.transform(&mut packed, Direction::Forward);
        let points = spectrum.len();

        let mut bins = Vec::with_capacity(points + 1);
        for (k, (a, b)) in self.split_a.iter().zip(&self.split_b).enumerate() {
            let x = spectrum[k];
            let xc = spectrum[(points - k) % points];
            bins.push(Complex::new(
                x.re * a.re - x.im * a.im + xc.re * b.re + xc.im * b.im,
                x.im * a.re + x.re * a.im + xc.re * b.im - xc.im * b.re,
            ));
        }
        bins.push(Complex::new(spectrum[0].re - spectrum[0].im, 0.0));
        Ok(bins)
    }

    /// Computes the full `N`-bin spectrum; bins above Nyquist are the conjugate mirror
    /// of the ones below.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidInputLength`] if `input` has fewer than `N` samples.
    pub fn forward_full(&self, input: &[f32]) -> AudioTraitResult<Vec<Complex<f32>>> {
        let mut bins = self.forward(input)?;
        let points = self.fft_length / 2;
        let mirrored: Vec<Complex<f32>> = bins[1..points].iter().rev().map(|b| b.conj()).collect();
        bins.extend(mirrored);
        Ok(bins)
    }

    /// Reconstructs `N` real samples from `N/2 + 1` bins produced by [`RealValuedFft::forward`].
    ///
    /// Extra bins past Nyquist are ignored.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidInputLength`] if fewer than `N/2 + 1` bins are given.
    pub fn inverse(&self, bins: &[Complex<f32>]) -> AudioTraitResult<Vec<f32>> {
        let points = self.fft_length / 2;
        if bins.len() < points + 1 {
            return Err(AudioTraitError::InvalidInputLength {
                expected: points + 1,
                actual: bins.len(),
            });
        }

        let mut packed: Vec<Complex<f32>> = self
            .split_a
            .iter()
            .zip(&self.split_b)
            .enumerate()
            .map(|(k, (a, b))| {
                let x = bins[k];
                let xc = bins[points - k];
                Complex::new(
                    x.re * a.re + x.im * a.im + xc.re * b.re - xc.im * b.im,
                    x.im * a.re - x.re * a.im - xc.re * b.im - xc.im * b.re,
                )
            })
            .collect();
        let values = self.transform(&mut packed, Direction::Inverse);

        Ok(values.iter().flat_map(|z| [z.re, z.im]).collect())
    }

    /// Complex transform of `data` (length `M`); `data` is used as scratch space.
    fn transform(&self, data: &mut [Complex<f32>], direction: Direction) -> Vec<Complex<f32>> {
        let points = data.len();
        let mut stride = points;
        let mut offset = 0;

        while stride > self.radix.value() {
            let quarter = stride / 4;
            let twiddles = &self.twiddles[offset..offset + 3 * quarter];

            for block in data.chunks_exact_mut(stride) {
                for (b, w) in twiddles.chunks_exact(3).enumerate() {
                    let [x0, x1, x2, x3] = [0, 1, 2, 3].map(|tap| block[b + tap * quarter]);
                    let sum02 = x0 + x2;
                    let diff02 = x0 - x2;
                    let sum13 = x1 + x3;
                    let rot = direction.rotate(x1 - x3);

                    block[b] = sum02 + sum13;
                    block[b + quarter] = (sum02 - sum13) * direction.orient(w[1]);
                    block[b + 2 * quarter] = (diff02 + rot) * direction.orient(w[0]);
                    block[b + 3 * quarter] = (diff02 - rot) * direction.orient(w[2]);
                }
            }

            offset += 3 * quarter;
            stride /= 4;
        }

        let shift = MAX_POINTS_LOG2 - points.trailing_zeros();
        let quarter = points / 4;
        let mut output = vec![Complex::zero(); points];

        for (group, taps) in data.chunks_exact(4).enumerate() {
            let base = bit_reverse_group(group) >> shift;
            let (x0, x1, x2, x3) = (taps[0], taps[1], taps[2], taps[3]);
            let values = match self.radix {
                Radix::Four => {
                    let sum02 = x0 + x2;
                    let diff02 = x0 - x2;
                    let sum13 = x1 + x3;
                    let rot = direction.rotate(x1 - x3);
                    [sum02 + sum13, diff02 + rot, sum02 - sum13, diff02 - rot]
                }
                Radix::Two => [x0 + x1, x2 + x3, x0 - x1, x2 - x3],
            };
            for (k, value) in values.into_iter().enumerate() {
                output[base + k * quarter] = value;
            }
        }

        if direction == Direction::Inverse {
            let scale = 1.0 / points as f32;
            output.iter_mut().for_each(|value| *value *= scale);
        }
        output
    }
}

/// Reverses the 12 low bits of `group`.
fn bit_reverse_group(group: usize) -> usize {
    let low = usize::from(BIT_REVERSAL_TABLE[group & 0x3F]);
    let high = usize::from(BIT_REVERSAL_TABLE[(group >> 6) & 0x3F]);
    (low << 6) | high
}

/// Twiddles of every radix-4 stage, laid out stage after stage.
///
/// Each stage of stride `s` stores `(w, w², w³)` for `w = e^{2πi·b/s}`, `b` in `0..s/4`.
fn twiddle_table(points: usize) -> Vec<Complex<f32>> {
    let quarter = points / 4;
    let mut table = Vec::with_capacity(points);
    let mut step = 1;
    while step <= quarter {
        for i in (0..quarter).step_by(step) {
            for harmonic in 1..=3 {
                let angle = 2.0 * PI * (harmonic * i) as f64 / points as f64;
                table.push(Complex::new(angle.cos() as f32, angle.sin() as f32));
            }
        }
        step <<= 2;
    }
    table
}

/// Coefficients that separate the spectra of the even and odd samples of a packed
/// real signal.
fn split_tables(fft_length: usize) -> (Vec<Complex<f32>>, Vec<Complex<f32>>) {
    (0..fft_length / 2)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / fft_length as f64;
            let (sin, cos) = theta.sin_cos();
            (
                Complex::new((0.5 * (1.0 - sin)) as f32, (-0.5 * cos) as f32),
                Complex::new((0.5 * (1.0 + sin)) as f32, (0.5 * cos) as f32),
            )
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const ALL_LENGTHS: [usize; 12] = [
        16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768,
    ];

    fn random_signal(len: usize, seed: u64) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| rng.random_range(-1.0f32..1.0)).collect()
    }

    fn naive_dft(input: &[f32]) -> Vec<Complex<f64>> {
        let n = input.len();
        (0..=n / 2)
            .map(|k| {
                input.iter().enumerate().fold(Complex::zero(), |acc, (t, &x)| {
                    let angle = -2.0 * PI * (k * t) as f64 / n as f64;
                    acc + Complex::from_polar(f64::from(x), angle)
                })
            })
            .collect()
    }

    #[test]
    fn test_supported_lengths_and_radix() {
        let fft = RealValuedFft::new(16).unwrap();
        assert_eq!(fft.fft_length(), 16);
        assert_eq!(fft.num_bins(), 9);
        assert_eq!(fft.radix(), Radix::Two);

        assert_eq!(RealValuedFft::new(32).unwrap().radix(), Radix::Four);
        assert_eq!(RealValuedFft::new(4096).unwrap().radix(), Radix::Two);
        assert_eq!(RealValuedFft::new(8192).unwrap().radix(), Radix::Four);
        assert_eq!(RealValuedFft::new(MAX_FFT_LENGTH).unwrap().fft_length(), 32768);
    }

    #[test]
    fn test_length_rounds_up_to_power_of_two() {
        let fft = RealValuedFft::new(500).unwrap();
        assert_eq!(fft.fft_length(), 512);
        assert_eq!(fft.num_bins(), 257);
    }

    #[test]
    fn test_unsupported_lengths() {
        assert_eq!(
            RealValuedFft::new(8).unwrap_err(),
            AudioTraitError::UnsupportedLength {
                requested: 8,
                fft_length: 8
            }
        );
        assert!(RealValuedFft::new(0).is_err());
        assert!(RealValuedFft::new(1).is_err());
        assert_eq!(
            RealValuedFft::new(MAX_FFT_LENGTH + 1).unwrap_err(),
            AudioTraitError::UnsupportedLength {
                requested: MAX_FFT_LENGTH + 1,
                fft_length: 2 * MAX_FFT_LENGTH
            }
        );
        assert!(RealValuedFft::new(usize::MAX).is_err());
    }

    #[test]
    fn test_impulse_gives_flat_spectrum() {
        for len in ALL_LENGTHS {
            let fft = RealValuedFft::new(len).unwrap();
            let mut impulse = vec![0.0f32; len];
            impulse[0] = 1.0;

            let bins = fft.forward(&impulse).unwrap();
            assert_eq!(bins.len(), len / 2 + 1);
            for bin in &bins {
                assert!((bin.norm() - 1.0).abs() < 1e-5, "length {len}: {bin}");
            }
        }
    }

    #[test]
    fn test_ramp_reference_spectrum() {
        let fft = RealValuedFft::new(16).unwrap();
        let ramp: Vec<f32> = (1..=16).map(|i| 0.0625 * i as f32).collect();
        let bins = fft.forward(&ramp).unwrap();

        let expected_im = [0.0, 2.5137, 1.2071, 0.7483, 0.5, 0.3341, 0.2071, 0.0995, 0.0];
        assert_approx_eq!(f64::from(bins[0].re), 8.5, 1e-4);
        for (k, bin) in bins.iter().enumerate().skip(1) {
            assert!((bin.re + 0.5).abs() < 5e-4, "bin {k}: {bin}");
            assert!((bin.im - expected_im[k]).abs() < 5e-4, "bin {k}: {bin}");
        }
    }

    #[test]
    fn test_matches_direct_dft() {
        for (len, seed) in [(16, 1), (32, 2), (64, 3), (128, 4), (512, 5)] {
            let input = random_signal(len, seed);
            let fft = RealValuedFft::new(len).unwrap();
            let bins = fft.forward(&input).unwrap();
            let reference = naive_dft(&input);

            let peak = reference.iter().map(|c| c.norm()).fold(0.0, f64::max);
            for (k, (got, want)) in bins.iter().zip(&reference).enumerate() {
                let got = Complex::new(f64::from(got.re), f64::from(got.im));
                let error = (got - want).norm() / peak;
                assert!(error < 1e-5, "length {len}, bin {k}: {got} vs {want}");
            }
        }
    }

    #[test]
    fn test_round_trip() {
        for (i, len) in ALL_LENGTHS.into_iter().enumerate() {
            let input = random_signal(len, 100 + i as u64);
            let fft = RealValuedFft::new(len).unwrap();
            let restored = fft.inverse(&fft.forward(&input).unwrap()).unwrap();

            assert_eq!(restored.len(), len);
            let max_error = input
                .iter()
                .zip(&restored)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0f32, f32::max);
            assert!(max_error < 1e-6, "length {len}: max error {max_error}");
        }
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RealValuedFft>();

        let fft = RealValuedFft::new(1024).unwrap();
        let inputs: Vec<Vec<f32>> = (0..4).map(|seed| random_signal(1024, 200 + seed)).collect();
        let expected: Vec<_> = inputs.iter().map(|input| fft.forward(input).unwrap()).collect();

        let shared = &fft;
        std::thread::scope(|scope| {
            let handles: Vec<_> = inputs
                .iter()
                .map(|input| scope.spawn(move || shared.forward(input).unwrap()))
                .collect();
            for (handle, want) in handles.into_iter().zip(&expected) {
                assert_eq!(&handle.join().unwrap(), want);
            }
        });
    }

    #[test]
    fn test_cosine_lands_in_its_bin() {
        let len = 64;
        let fft = RealValuedFft::new(len).unwrap();
        let cosine: Vec<f32> = (0..len)
            .map(|t| (2.0 * PI * 5.0 * t as f64 / len as f64).cos() as f32)
            .collect();
        let bins = fft.forward(&cosine).unwrap();

        assert_approx_eq!(f64::from(bins[5].norm()), 32.0, 1e-4);
        for (k, bin) in bins.iter().enumerate().filter(|(k, _)| *k != 5) {
            assert!(bin.norm() < 1e-3, "bin {k}: {bin}");
        }
    }

    #[test]
    fn test_sine_peak_stands_out() {
        let sample_rate = 48_000.0f64;
        let limit = crate::utils::audio_math::db_to_linear(-4.0);

        for len in [256, 1024, 4096] {
            let fft = RealValuedFft::new(len).unwrap();
            for frequency in [200.0f64, 1000.0, 10_000.0] {
                let sine: Vec<f32> = (0..len)
                    .map(|t| (2.0 * PI * frequency * t as f64 / sample_rate).sin() as f32)
                    .collect();
                let magnitudes: Vec<f32> = fft.forward(&sine).unwrap().iter().map(|b| b.norm()).collect();
                let peak = magnitudes.iter().copied().fold(0.0f32, f32::max);

                let expected = (frequency / sample_rate * len as f64).round() as usize;
                assert_eq!(magnitudes[expected], peak, "length {len}, {frequency} Hz");
                for (k, m) in magnitudes.iter().enumerate().filter(|(k, _)| *k != expected) {
                    assert!(m / peak < limit, "length {len}, {frequency} Hz, bin {k}");
                }
            }
        }
    }

    #[test]
    fn test_zeros_stay_zero() {
        let fft = RealValuedFft::new(256).unwrap();
        let bins = fft.forward(&[0.0; 256]).unwrap();
        assert!(bins.iter().all(|b| b.norm() == 0.0));
        assert!(fft.inverse(&bins).unwrap().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_full_spectrum_is_conjugate_symmetric() {
        let input = random_signal(64, 7);
        let fft = RealValuedFft::new(64).unwrap();
        let full = fft.forward_full(&input).unwrap();

        assert_eq!(full.len(), 64);
        for k in 1..32 {
            assert_eq!(full[64 - k], full[k].conj());
        }
    }

    #[test]
    fn test_input_length_contract() {
        let fft = RealValuedFft::new(32).unwrap();
        assert_eq!(
            fft.forward(&[0.0; 31]).unwrap_err(),
            AudioTraitError::InvalidInputLength {
                expected: 32,
                actual: 31
            }
        );

        let mut longer = random_signal(40, 9);
        let exact = fft.forward(&longer[..32]).unwrap();
        longer[35] = 100.0;
        assert_eq!(fft.forward(&longer).unwrap(), exact);

        assert_eq!(
            fft.inverse(&exact[..16]).unwrap_err(),
            AudioTraitError::InvalidInputLength {
                expected: 17,
                actual: 16
            }
        );
    }

    #[test]
    fn test_bit_reverse_group() {
        assert_eq!(bit_reverse_group(0), 0);
        assert_eq!(bit_reverse_group(1), 0x800);
        assert_eq!(bit_reverse_group(0x800), 1);
        assert_eq!(bit_reverse_group(0b110), 0b0110_0000_0000);
    }
}
