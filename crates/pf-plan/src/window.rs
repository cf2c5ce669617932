//! Radio bandwidth per channel bandwidth

/// Radio bandwidth used for channel widths without an explicit entry
pub const DEFAULT_RADIO_BANDWIDTH_HZ: u32 = 925_000;

/// Bandwidth (Hz) a single radio must cover to host a channel of the given
/// width (Hz).
pub fn radio_window(channel_bandwidth_hz: i64) -> u32 {
    match channel_bandwidth_hz {
        500_000 => 1_100_000,
        250_000 => 1_000_000,
        125_000 => 925_000,
        _ => DEFAULT_RADIO_BANDWIDTH_HZ,
    }
}
