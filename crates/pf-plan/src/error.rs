//! Error types for channel planning

use std::fmt;

use thiserror::Error;

use crate::channel::Channel;

/// The single-instance slot kinds of a concentrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// LoRa channel locked to one spreading factor (`chan_Lora_std`)
    SingleSf,
    /// FSK channel (`chan_FSK`)
    Fsk,
}

impl SlotKind {
    /// Returns a human-readable name for the slot kind
    pub fn name(&self) -> &'static str {
        match self {
            SlotKind::SingleSf => "LoRa std (single SF)",
            SlotKind::Fsk => "FSK",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur while assigning channels to radios
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Modulation and spreading-factor combination is not usable
    #[error("invalid modulation for channel {channel}")]
    InvalidModulation { channel: Channel },

    /// More than one channel maps to a single-instance slot
    #[error("{0} channel already configured")]
    DuplicateSlot(SlotKind),
}
