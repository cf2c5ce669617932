//! Packet-Forwarder Configuration
//!
//! This crate applies a [`pf_plan::GatewayRadioConfiguration`] to a
//! packet-forwarder configuration document (`global_conf.json`):
//!
//! - **Document**: the JSON tree, loaded with `/* ... */` comments stripped,
//!   with typed path lookups
//! - **Merge**: overwrites the radio and channel keys of `SX1301_conf` and the
//!   gateway ID in `gateway_conf`, leaving every other key untouched
//! - **Gateway ID**: the 64-bit gateway identifier and its hex form
//!
//! The packet-forwarder treats each section key as a complete override, so the
//! existing document must be edited in place to keep board-specific values
//! such as calibration tables.
//!
//! # Example
//!
//! ```rust
//! use pf_config::{merge, ConfigDocument, GatewayId};
//! use pf_plan::{plan_gateway, Channel};
//!
//! let mut doc = ConfigDocument::parse(r#"{
//!     "SX1301_conf": {
//!         "radio_0": { "enable": false, "freq": 0, "rssi_offset": -166.0 },
//!         "chan_multiSF_0": { "enable": false, "radio": 0, "if": 0 },
//!         "chan_Lora_std": { "enable": false },
//!         "chan_FSK": { "enable": false }
//!     },
//!     "gateway_conf": { "gateway_ID": "" }
//! }"#).unwrap();
//!
//! let plan = plan_gateway(&[Channel::lora(868_100_000, 125, vec![7, 8, 9])]).unwrap();
//! merge(&mut doc, GatewayId(0x0102030405060708), &plan).unwrap();
//!
//! assert!(doc.to_string_pretty().unwrap().contains("\"0102030405060708\""));
//! ```

pub mod document;
pub mod error;
pub mod gateway_id;
pub mod merge;

pub use document::{strip_comments, ConfigDocument, KeyPath};
pub use error::{DocumentError, GatewayIdError, MergeError};
pub use gateway_id::GatewayId;
pub use merge::{merge, merge_with, MergeOptions, StalePolicy, GATEWAY_SECTION, SX1301_SECTION};
