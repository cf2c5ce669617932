//! Channel ordering
//!
//! Channels are sorted by the center frequency a radio would need if the
//! channel sat exactly on the left edge of that radio's window. Processing the
//! lowest such frequency first means a radio's center, once fixed by its first
//! member, only ever has to accommodate channels further to the right.

use crate::channel::Channel;
use crate::window::radio_window;

/// Minimum radio center frequency (Hz) able to host the channel
pub fn min_radio_center_frequency(channel: &Channel) -> i64 {
    let radio_bandwidth = i64::from(radio_window(channel.bandwidth_hz()));
    channel.min_frequency() + radio_bandwidth / 2
}

/// Sort channels ascending by [`min_radio_center_frequency`]
///
/// The sort is stable: channels with equal keys keep their input order.
pub fn sort_channels(channels: &mut [Channel]) {
    channels.sort_by_key(min_radio_center_frequency);
}
