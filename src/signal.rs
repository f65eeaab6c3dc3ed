//! Read-only signal adapters.
//!
//! Checks never own or modify the audio they inspect. Anything that can hand out
//! equal-length, contiguous `f32` channel buffers can be analysed by implementing
//! [`Signal`]; two adapters are provided:
//!
//! - [`RawSignal`] borrows existing channel slices (the `float**` style buffers most
//!   audio callbacks deliver).
//! - [`MatrixSignal`] owns an `ndarray::Array2<f32>` with one row per channel.
//!
//! Channel indices on this trait are 0-based. The 1-based numbering of the public
//! check API is translated by [`crate::ChannelSelection::resolve`].

use ndarray::{Array2, ArrayView2};

use crate::{AudioTraitError, AudioTraitResult};

/// Common read-only interface for multichannel audio.
///
/// Implementations guarantee that every channel has [`Signal::num_samples`] samples.
pub trait Signal {
    /// Returns the number of channels.
    fn num_channels(&self) -> usize;

    /// Returns the number of samples per channel.
    fn num_samples(&self) -> usize;

    /// Returns the samples of the channel at `index` (0-based).
    ///
    /// # Errors
    /// Returns [`AudioTraitError::ChannelOutOfRange`] if the channel does not exist.
    fn channel(&self, index: usize) -> AudioTraitResult<&[f32]>;

    /// Returns an owned copy of the channel at `index` (0-based).
    ///
    /// # Errors
    /// Returns [`AudioTraitError::ChannelOutOfRange`] if the channel does not exist.
    fn channel_copy(&self, index: usize) -> AudioTraitResult<Vec<f32>> {
        Ok(self.channel(index)?.to_vec())
    }

    /// Returns true if the signal carries no samples at all.
    fn is_empty(&self) -> bool {
        self.num_channels() == 0 || self.num_samples() == 0
    }
}

fn channel_out_of_range(index: usize, num_channels: usize) -> AudioTraitError {
    AudioTraitError::ChannelOutOfRange {
        channel: index + 1,
        num_channels,
    }
}

/// A signal view over borrowed channel buffers.
#[derive(Debug, Clone)]
pub struct RawSignal<'a> {
    channels: Vec<&'a [f32]>,
    num_samples: usize,
}

impl<'a> RawSignal<'a> {
    /// Wraps a set of channel buffers.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::SizeMismatch`] if the channels differ in length.
    pub fn new(channels: &[&'a [f32]]) -> AudioTraitResult<Self> {
        let num_samples = channels.first().map_or(0, |c| c.len());
        if let Some(position) = channels.iter().position(|c| c.len() != num_samples) {
            return Err(AudioTraitError::size_mismatch(format!(
                "all channels must be of equal length: channel {} has {} samples, expected {}",
                position + 1,
                channels[position].len(),
                num_samples
            )));
        }

        Ok(Self {
            channels: channels.to_vec(),
            num_samples,
        })
    }

    /// Wraps a single mono buffer.
    pub fn mono(samples: &'a [f32]) -> Self {
        Self {
            channels: vec![samples],
            num_samples: samples.len(),
        }
    }
}

impl Signal for RawSignal<'_> {
    fn num_channels(&self) -> usize {
        self.channels.len()
    }

    fn num_samples(&self) -> usize {
        self.num_samples
    }

    fn channel(&self, index: usize) -> AudioTraitResult<&[f32]> {
        self.channels
            .get(index)
            .copied()
            .ok_or_else(|| channel_out_of_range(index, self.channels.len()))
    }
}

/// An owned signal stored as a `(channels, samples)` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSignal {
    data: Array2<f32>,
}

impl MatrixSignal {
    /// Creates a signal from a `(channels, samples)` array.
    ///
    /// The data is kept in standard (row-major) layout so every channel is contiguous.
    pub fn new(data: Array2<f32>) -> Self {
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Self { data }
    }

    /// Creates a signal from per-channel vectors.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::SizeMismatch`] if the channels differ in length.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> AudioTraitResult<Self> {
        let num_channels = channels.len();
        let num_samples = channels.first().map_or(0, Vec::len);
        if channels.iter().any(|c| c.len() != num_samples) {
            return Err(AudioTraitError::size_mismatch(
                "all channels must be of equal length",
            ));
        }

        let flat: Vec<f32> = channels.into_iter().flatten().collect();
        let data = Array2::from_shape_vec((num_channels, num_samples), flat)
            .map_err(|e| AudioTraitError::size_mismatch(format!("array shape error: {e}")))?;
        Ok(Self { data })
    }

    /// Returns a read-only view of the underlying matrix.
    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }
}

impl Signal for MatrixSignal {
    fn num_channels(&self) -> usize {
        self.data.nrows()
    }

    fn num_samples(&self) -> usize {
        self.data.ncols()
    }

    fn channel(&self, index: usize) -> AudioTraitResult<&[f32]> {
        if index >= self.data.nrows() {
            return Err(channel_out_of_range(index, self.data.nrows()));
        }
        let start = index * self.data.ncols();
        let all = self
            .data
            .as_slice()
            .ok_or_else(|| AudioTraitError::InvalidSignal("samples must be contiguous".to_string()))?;
        Ok(&all[start..start + self.data.ncols()])
    }
}
