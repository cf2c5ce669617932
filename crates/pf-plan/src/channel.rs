//! Channel plan model

use std::fmt;

/// Modulation of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Modulation {
    /// LoRa chirp spread spectrum
    #[cfg_attr(feature = "serde", serde(rename = "LORA"))]
    LoRa,
    /// Frequency shift keying
    #[cfg_attr(feature = "serde", serde(rename = "FSK"))]
    Fsk,
}

impl Modulation {
    /// Returns a human-readable name for the modulation
    pub fn name(&self) -> &'static str {
        match self {
            Modulation::LoRa => "LoRa",
            Modulation::Fsk => "FSK",
        }
    }
}

/// A logical channel of the plan
///
/// Input order of channels carries no meaning; the assignment derives its own
/// order (see [`crate::ordering`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel {
    /// Center frequency in Hz
    pub frequency: u32,
    /// Channel bandwidth in kHz
    pub bandwidth: u32,
    /// Modulation
    pub modulation: Modulation,
    /// Spreading factors (LoRa only); one entry means a single-SF channel
    #[cfg_attr(feature = "serde", serde(default))]
    pub spreading_factors: Vec<u8>,
    /// Bitrate in bit/s (FSK only)
    #[cfg_attr(feature = "serde", serde(default))]
    pub bitrate: u32,
}

impl Channel {
    /// Create a LoRa channel
    pub fn lora(frequency: u32, bandwidth_khz: u32, spreading_factors: Vec<u8>) -> Self {
        Self {
            frequency,
            bandwidth: bandwidth_khz,
            modulation: Modulation::LoRa,
            spreading_factors,
            bitrate: 0,
        }
    }

    /// Create an FSK channel
    pub fn fsk(frequency: u32, bandwidth_khz: u32, bitrate: u32) -> Self {
        Self {
            frequency,
            bandwidth: bandwidth_khz,
            modulation: Modulation::Fsk,
            spreading_factors: Vec::new(),
            bitrate,
        }
    }

    /// Channel bandwidth in Hz
    pub fn bandwidth_hz(&self) -> i64 {
        i64::from(self.bandwidth) * 1000
    }

    /// Lowest frequency occupied by the channel
    pub fn min_frequency(&self) -> i64 {
        i64::from(self.frequency) - self.bandwidth_hz() / 2
    }

    /// Highest frequency occupied by the channel
    pub fn max_frequency(&self) -> i64 {
        i64::from(self.frequency) + self.bandwidth_hz() / 2
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz / {} kHz {}",
            self.frequency,
            self.bandwidth,
            self.modulation.name()
        )?;
        match self.modulation {
            Modulation::LoRa => write!(f, " SF{:?}", self.spreading_factors),
            Modulation::Fsk => write!(f, " {} bit/s", self.bitrate),
        }
    }
}
