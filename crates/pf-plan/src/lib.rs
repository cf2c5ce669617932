//! Concentrator Channel Planning
//!
//! This crate turns an abstract channel plan into a radio layout for a
//! multi-radio LoRa concentrator (SX1301 class boards):
//!
//! - **Radio window**: how much instantaneous bandwidth a radio must cover
//!   to host a channel of a given width
//! - **Ordering**: channels are processed by their minimum radio center
//!   frequency so the greedy assignment stays compact and deterministic
//! - **Assignment**: first-fit packing of channels onto radios, with each
//!   channel classified into a multi-SF, single-SF or FSK slot
//!
//! # Example
//!
//! ```rust
//! use pf_plan::{plan_gateway, Channel};
//!
//! let channels = vec![
//!     Channel::lora(868_100_000, 125, vec![7, 8, 9, 10, 11, 12]),
//!     Channel::lora(868_300_000, 125, vec![7, 8, 9, 10, 11, 12]),
//!     Channel::lora(868_500_000, 125, vec![7]),
//! ];
//!
//! let config = plan_gateway(&channels).unwrap();
//! assert_eq!(config.radios.len(), 1);
//! assert_eq!(config.multi_sf_slots.len(), 2);
//! assert!(config.single_sf_slot.is_some());
//! ```

pub mod assign;
pub mod channel;
pub mod error;
pub mod ordering;
pub mod window;

pub use assign::{
    assign, plan_gateway, FskSlot, GatewayRadioConfiguration, MultiSfSlot, Radio, SingleSfSlot,
};
pub use channel::{Channel, Modulation};
pub use error::{PlanError, SlotKind};
pub use ordering::{min_radio_center_frequency, sort_channels};
pub use window::{radio_window, DEFAULT_RADIO_BANDWIDTH_HZ};
