//! Channel and frequency selections.
//!
//! Selections describe *which part* of a signal a check looks at. They are plain,
//! validated value types and know nothing about a particular signal until they are
//! resolved against one.

pub mod channels;
pub mod frequencies;

pub use channels::{ChannelSelection, MAX_CHANNEL_NUMBER, SelectionItem};
pub use frequencies::{FreqBand, Freqs, FrequencySelection};
