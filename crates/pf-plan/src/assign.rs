//! Radio assignment engine
//!
//! Packs the channels of a plan onto radios. Each radio covers a window of
//! [`radio_window`] Hz around its center frequency; a channel is placed on the
//! first existing radio whose window fully contains it, otherwise a new radio
//! is created with the channel sitting on the left edge of its window.

use std::fmt;

use tracing::{debug, info};

use crate::channel::{Channel, Modulation};
use crate::error::{PlanError, SlotKind};
use crate::ordering::sort_channels;
use crate::window::radio_window;

/// A physical radio of the concentrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Radio {
    /// Always true once the radio has been created
    pub enabled: bool,
    /// Center frequency in Hz
    pub center_frequency: i64,
}

impl Radio {
    fn covers(&self, channel: &Channel, radio_bandwidth: i64) -> bool {
        channel.min_frequency() >= self.center_frequency - radio_bandwidth / 2
            && channel.max_frequency() <= self.center_frequency + radio_bandwidth / 2
    }
}

/// Multi spreading-factor LoRa channel slot (`chan_multiSF_<n>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiSfSlot {
    pub enabled: bool,
    /// Index of the owning radio
    pub radio_index: usize,
    /// Channel frequency minus radio center frequency, in Hz
    pub if_offset: i64,
    /// Channel frequency in Hz
    pub frequency: u32,
}

/// Single spreading-factor LoRa channel slot (`chan_Lora_std`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleSfSlot {
    pub enabled: bool,
    pub radio_index: usize,
    pub if_offset: i64,
    /// Channel bandwidth in Hz
    pub bandwidth: i64,
    pub spread_factor: u8,
    pub frequency: u32,
}

/// FSK channel slot (`chan_FSK`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FskSlot {
    pub enabled: bool,
    pub radio_index: usize,
    pub if_offset: i64,
    /// Channel bandwidth in kHz, as given by the plan
    pub bandwidth: u32,
    /// Bitrate in bit/s
    pub bitrate: u32,
    pub frequency: u32,
}

/// Radio layout of a gateway, produced from one channel plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayRadioConfiguration {
    /// Radios in creation order; a radio's index is its identity
    pub radios: Vec<Radio>,
    /// Multi-SF slots in processing order
    pub multi_sf_slots: Vec<MultiSfSlot>,
    /// The single-SF slot, if a channel needs it
    pub single_sf_slot: Option<SingleSfSlot>,
    /// The FSK slot, if a channel needs it
    pub fsk_slot: Option<FskSlot>,
}

impl GatewayRadioConfiguration {
    /// Index of the first radio covering the channel, creating one if needed
    fn radio_for(&mut self, channel: &Channel) -> usize {
        let radio_bandwidth = i64::from(radio_window(channel.bandwidth_hz()));

        if let Some(index) = self
            .radios
            .iter()
            .position(|r| r.covers(channel, radio_bandwidth))
        {
            return index;
        }

        let radio = Radio {
            enabled: true,
            center_frequency: channel.min_frequency() + radio_bandwidth / 2,
        };
        debug!(
            "Added radio {} centered at {} Hz for {}",
            self.radios.len(),
            radio.center_frequency,
            channel
        );
        self.radios.push(radio);
        self.radios.len() - 1
    }

    fn set_single_sf(&mut self, slot: SingleSfSlot) -> Result<(), PlanError> {
        if self.single_sf_slot.is_some() {
            return Err(PlanError::DuplicateSlot(SlotKind::SingleSf));
        }
        self.single_sf_slot = Some(slot);
        Ok(())
    }

    fn set_fsk(&mut self, slot: FskSlot) -> Result<(), PlanError> {
        if self.fsk_slot.is_some() {
            return Err(PlanError::DuplicateSlot(SlotKind::Fsk));
        }
        self.fsk_slot = Some(slot);
        Ok(())
    }

    /// Total number of channel slots in use
    pub fn channel_count(&self) -> usize {
        self.multi_sf_slots.len()
            + usize::from(self.single_sf_slot.is_some())
            + usize::from(self.fsk_slot.is_some())
    }
}

impl fmt::Display for GatewayRadioConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let centers: Vec<String> = self
            .radios
            .iter()
            .map(|r| format!("{:.3} MHz", r.center_frequency as f64 / 1_000_000.0))
            .collect();
        write!(
            f,
            "{} radio(s) [{}], {} multi-SF, {} single-SF, {} FSK",
            self.radios.len(),
            centers.join(", "),
            self.multi_sf_slots.len(),
            usize::from(self.single_sf_slot.is_some()),
            usize::from(self.fsk_slot.is_some()),
        )
    }
}

/// Assign an already ordered channel plan to radios and slots
///
/// Channels must be sorted with [`sort_channels`] first; use
/// [`plan_gateway`] to do both.
pub fn assign(channels: &[Channel]) -> Result<GatewayRadioConfiguration, PlanError> {
    let mut gc = GatewayRadioConfiguration::default();

    for channel in channels {
        let radio_index = gc.radio_for(channel);
        let if_offset = i64::from(channel.frequency) - gc.radios[radio_index].center_frequency;

        match (channel.modulation, channel.spreading_factors.as_slice()) {
            (Modulation::Fsk, _) if channel.bitrate > 0 => {
                gc.set_fsk(FskSlot {
                    enabled: true,
                    radio_index,
                    if_offset,
                    bandwidth: channel.bandwidth,
                    bitrate: channel.bitrate,
                    frequency: channel.frequency,
                })?;
            }
            (Modulation::LoRa, [sf]) => {
                gc.set_single_sf(SingleSfSlot {
                    enabled: true,
                    radio_index,
                    if_offset,
                    bandwidth: channel.bandwidth_hz(),
                    spread_factor: *sf,
                    frequency: channel.frequency,
                })?;
            }
            (Modulation::LoRa, [_, _, ..]) => {
                gc.multi_sf_slots.push(MultiSfSlot {
                    enabled: true,
                    radio_index,
                    if_offset,
                    frequency: channel.frequency,
                });
            }
            _ => {
                return Err(PlanError::InvalidModulation {
                    channel: channel.clone(),
                })
            }
        }

        debug!("Channel {} -> radio {} (IF {} Hz)", channel, radio_index, if_offset);
    }

    Ok(gc)
}

/// Order the plan and assign it to radios
pub fn plan_gateway(channels: &[Channel]) -> Result<GatewayRadioConfiguration, PlanError> {
    let mut ordered = channels.to_vec();
    sort_channels(&mut ordered);

    let gc = assign(&ordered)?;
    info!("Planned {} channel(s): {}", channels.len(), gc);
    Ok(gc)
}
