//! Channel selections.
//!
//! Channels are numbered from 1 in the public API. A selection is a deduplicated set
//! built from single channels and inclusive ranges; the empty selection means
//! "all channels" and is only expanded when resolved against a concrete signal.

use std::collections::BTreeSet;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::{AudioTraitError, AudioTraitResult, Signal};

/// Highest channel number a selection accepts.
pub const MAX_CHANNEL_NUMBER: usize = 1 << 16;

/// One entry of a [`ChannelSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum SelectionItem {
    /// A single channel (1-based).
    Channel(usize),
    /// An inclusive range of channels (1-based).
    Range {
        /// First channel of the range.
        first: usize,
        /// Last channel of the range (inclusive).
        last: usize,
    },
}

impl SelectionItem {
    /// Checks that the item names only channels in `1..=MAX_CHANNEL_NUMBER` and that
    /// ranges are not inverted.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidChannelSelection`] for channel 0, a channel above
    /// [`MAX_CHANNEL_NUMBER`] or `last < first`.
    pub fn validate(&self) -> AudioTraitResult<()> {
        let highest = match *self {
            Self::Channel(channel) => channel,
            Self::Range { last, .. } => last,
        };
        if highest > MAX_CHANNEL_NUMBER {
            return Err(AudioTraitError::InvalidChannelSelection(format!(
                "channel {highest} exceeds the maximum of {MAX_CHANNEL_NUMBER}"
            )));
        }

        match *self {
            Self::Channel(0) => Err(AudioTraitError::InvalidChannelSelection(
                "channel numbers start at 1".to_string(),
            )),
            Self::Channel(_) => Ok(()),
            Self::Range { first, last } if first == 0 || last < first => {
                Err(AudioTraitError::InvalidChannelSelection(format!(
                    "invalid range {first}..={last}"
                )))
            }
            Self::Range { .. } => Ok(()),
        }
    }

    /// Number of channels covered by this item.
    pub const fn len(&self) -> usize {
        match *self {
            Self::Channel(_) => 1,
            Self::Range { first, last } => last.saturating_sub(first) + 1,
        }
    }

    /// Always false; every item covers at least one channel.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the channel numbers covered by this item.
    pub fn channels(&self) -> impl Iterator<Item = usize> {
        match *self {
            Self::Channel(channel) => channel..=channel,
            Self::Range { first, last } => first..=last,
        }
    }
}

impl From<usize> for SelectionItem {
    fn from(channel: usize) -> Self {
        Self::Channel(channel)
    }
}

impl From<(usize, usize)> for SelectionItem {
    fn from((first, last): (usize, usize)) -> Self {
        Self::Range { first, last }
    }
}

/// A validated, deduplicated set of 1-based channel numbers.
///
/// # Examples
/// ```rust
/// use audio_traits::{ChannelSelection, SelectionItem};
///
/// let a = ChannelSelection::from_items([
///     SelectionItem::from(1usize),
///     SelectionItem::from(2usize),
///     SelectionItem::from((4usize, 7usize)),
///     SelectionItem::from(2usize),
/// ])
/// .unwrap();
/// let b = ChannelSelection::new().with_channel(2).unwrap().with_channel(1).unwrap().with_range(4, 7).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.channels().iter().copied().collect::<Vec<_>>(), vec![1, 2, 4, 5, 6, 7]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSelection {
    channels: BTreeSet<usize>,
}

impl ChannelSelection {
    /// Creates the empty selection, which resolves to all channels of a signal.
    pub const fn new() -> Self {
        Self {
            channels: BTreeSet::new(),
        }
    }

    /// Alias for [`ChannelSelection::new`], reads better at call sites.
    pub const fn all() -> Self {
        Self::new()
    }

    /// Builds a selection from a list of items.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidChannelSelection`] for any malformed item.
    pub fn from_items<I>(items: I) -> AudioTraitResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<SelectionItem>,
    {
        items
            .into_iter()
            .try_fold(Self::new(), |selection, item| selection.with_item(item.into()))
    }

    /// Adds an item to the selection.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidChannelSelection`] if the item is malformed.
    pub fn with_item(mut self, item: SelectionItem) -> AudioTraitResult<Self> {
        item.validate()?;
        self.channels.extend(item.channels());
        Ok(self)
    }

    /// Adds a single channel (1-based).
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidChannelSelection`] for channel 0.
    pub fn with_channel(self, channel: usize) -> AudioTraitResult<Self> {
        self.with_item(SelectionItem::Channel(channel))
    }

    /// Adds an inclusive range of channels (1-based).
    ///
    /// # Errors
    /// Returns [`AudioTraitError::InvalidChannelSelection`] for channel 0, a channel above
    /// [`MAX_CHANNEL_NUMBER`] or `last < first`.
    pub fn with_range(self, first: usize, last: usize) -> AudioTraitResult<Self> {
        self.with_item(SelectionItem::Range { first, last })
    }

    /// Returns the stored channel set (empty means "all channels").
    pub const fn channels(&self) -> &BTreeSet<usize> {
        &self.channels
    }

    /// Returns true if no channel was selected explicitly.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Resolves the selection against a signal.
    ///
    /// The empty selection expands to `1..=num_channels`; otherwise every stored channel
    /// is checked against the signal's channel count and the set is returned unchanged.
    ///
    /// # Errors
    /// Returns [`AudioTraitError::ChannelOutOfRange`] for the first channel the signal lacks.
    pub fn resolve<S: Signal + ?Sized>(&self, signal: &S) -> AudioTraitResult<BTreeSet<usize>> {
        let num_channels = signal.num_channels();
        if self.channels.is_empty() {
            return Ok((1..=num_channels).collect());
        }

        if let Some(&channel) = self.channels.iter().find(|&&c| c > num_channels) {
            return Err(AudioTraitError::ChannelOutOfRange {
                channel,
                num_channels,
            });
        }
        Ok(self.channels.clone())
    }
}
