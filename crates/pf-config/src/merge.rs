//! Radio plan merge
//!
//! The packet-forwarder reads each `SX1301_conf` entry as a complete override,
//! so a new radio plan is written key by key into the existing document. Chip
//! selection, calibration tables and every other key not listed below survive
//! the merge unchanged:
//!
//! - `SX1301_conf.radio_<n>.{enable, freq}`
//! - `SX1301_conf.chan_multiSF_<n>.{enable, radio, if}`
//! - `SX1301_conf.chan_Lora_std.{enable, radio, if, bandwidth, spread_factor}`
//! - `SX1301_conf.chan_FSK.{enable, radio, if, bandwidth, datarate}`
//! - `gateway_conf.gateway_ID`
//!
//! Entries named `radio_<n>` or `chan_multiSF_<n>` with an index past the new
//! plan are stale. Only their `enable` key is read, and [`StalePolicy`] decides
//! whether it is rewritten. No other `SX1301_conf` entry is read.
//!
//! A failed merge is not rolled back; the document must not be saved.

use pf_plan::GatewayRadioConfiguration;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::document::{ConfigDocument, KeyPath};
use crate::error::MergeError;
use crate::gateway_id::GatewayId;

/// Concentrator section of the document
pub const SX1301_SECTION: &str = "SX1301_conf";
/// Gateway section of the document
pub const GATEWAY_SECTION: &str = "gateway_conf";

const RADIO_PREFIX: &str = "radio_";
const MULTI_SF_PREFIX: &str = "chan_multiSF_";

/// Handling of `radio_<n>` / `chan_multiSF_<n>` entries beyond the new plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Leave them as they are (a previous plan may have enabled them)
    #[default]
    Keep,
    /// Set `enable` to false
    Disable,
}

/// Merge options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Stale entry handling
    pub stale: StalePolicy,
}

/// Merge a radio plan into the document with default options
pub fn merge(
    doc: &mut ConfigDocument,
    gateway_id: GatewayId,
    config: &GatewayRadioConfiguration,
) -> Result<(), MergeError> {
    merge_with(doc, gateway_id, config, MergeOptions::default())
}

/// Merge a radio plan into the document
pub fn merge_with(
    doc: &mut ConfigDocument,
    gateway_id: GatewayId,
    config: &GatewayRadioConfiguration,
    options: MergeOptions,
) -> Result<(), MergeError> {
    // radios
    for (i, radio) in config.radios.iter().enumerate() {
        let entry = sx1301_entry(doc, &format!("{RADIO_PREFIX}{i}"))?;
        entry.insert("enable".into(), Value::Bool(radio.enabled));
        entry.insert("freq".into(), Value::from(radio.center_frequency));
    }

    // multi-SF channels
    for (i, slot) in config.multi_sf_slots.iter().enumerate() {
        let entry = sx1301_entry(doc, &format!("{MULTI_SF_PREFIX}{i}"))?;
        entry.insert("enable".into(), Value::Bool(slot.enabled));
        entry.insert("radio".into(), Value::from(slot.radio_index));
        entry.insert("if".into(), Value::from(slot.if_offset));
    }

    handle_stale(doc, config, options.stale)?;

    // LoRa std channel
    let entry = sx1301_entry(doc, "chan_Lora_std")?;
    match &config.single_sf_slot {
        Some(slot) => {
            entry.insert("enable".into(), Value::Bool(slot.enabled));
            entry.insert("radio".into(), Value::from(slot.radio_index));
            entry.insert("if".into(), Value::from(slot.if_offset));
            entry.insert("bandwidth".into(), Value::from(slot.bandwidth));
            entry.insert("spread_factor".into(), Value::from(slot.spread_factor));
        }
        None => {
            disable_channel(entry);
            entry.insert("spread_factor".into(), Value::from(0));
        }
    }

    // FSK channel
    let entry = sx1301_entry(doc, "chan_FSK")?;
    match &config.fsk_slot {
        Some(slot) => {
            entry.insert("enable".into(), Value::Bool(slot.enabled));
            entry.insert("radio".into(), Value::from(slot.radio_index));
            entry.insert("if".into(), Value::from(slot.if_offset));
            entry.insert("bandwidth".into(), Value::from(slot.bandwidth));
            entry.insert("datarate".into(), Value::from(slot.bitrate));
        }
        None => {
            disable_channel(entry);
            entry.insert("datarate".into(), Value::from(0));
        }
    }

    // gateway ID
    let gateway = doc.mapping_mut(&KeyPath::new([GATEWAY_SECTION]))?;
    gateway.insert("gateway_ID".into(), Value::String(gateway_id.to_string()));

    info!("Merged radio plan for gateway {}: {}", gateway_id, config);
    Ok(())
}

fn sx1301_entry<'a>(
    doc: &'a mut ConfigDocument,
    key: &str,
) -> Result<&'a mut Map<String, Value>, MergeError> {
    doc.mapping_mut(&KeyPath::new([SX1301_SECTION, key]))
}

fn disable_channel(entry: &mut Map<String, Value>) {
    entry.insert("enable".into(), Value::Bool(false));
    entry.insert("radio".into(), Value::from(0));
    entry.insert("if".into(), Value::from(0));
    entry.insert("bandwidth".into(), Value::from(0));
}

/// Index of a `<prefix><n>` key
fn indexed_key(key: &str, prefix: &str) -> Option<usize> {
    key.strip_prefix(prefix)?.parse().ok()
}

fn is_stale(key: &str, config: &GatewayRadioConfiguration) -> bool {
    indexed_key(key, RADIO_PREFIX).is_some_and(|i| i >= config.radios.len())
        || indexed_key(key, MULTI_SF_PREFIX).is_some_and(|i| i >= config.multi_sf_slots.len())
}

fn handle_stale(
    doc: &mut ConfigDocument,
    config: &GatewayRadioConfiguration,
    policy: StalePolicy,
) -> Result<(), MergeError> {
    let section = doc.mapping_mut(&KeyPath::new([SX1301_SECTION]))?;

    let stale = section
        .iter_mut()
        .filter(|(key, _)| is_stale(key, config))
        .filter_map(|(key, node)| match node {
            Value::Object(entry) => Some((key, entry)),
            _ => None,
        });

    for (key, entry) in stale {
        if entry.get("enable") != Some(&Value::Bool(true)) {
            continue;
        }

        match policy {
            StalePolicy::Keep => warn!(
                "{}.{} is not part of the new plan but stays enabled",
                SX1301_SECTION, key
            ),
            StalePolicy::Disable => {
                entry.insert("enable".into(), Value::Bool(false));
                debug!("Disabled stale {}.{}", SX1301_SECTION, key);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_key() {
        assert_eq!(indexed_key("radio_1", RADIO_PREFIX), Some(1));
        assert_eq!(indexed_key("chan_multiSF_7", MULTI_SF_PREFIX), Some(7));
        assert_eq!(indexed_key("radio_x", RADIO_PREFIX), None);
        assert_eq!(indexed_key("tx_lut_0", RADIO_PREFIX), None);
        assert_eq!(indexed_key("chan_Lora_std", MULTI_SF_PREFIX), None);
    }

    #[test]
    fn test_only_indexed_entries_are_stale() {
        let config = pf_plan::plan_gateway(&[pf_plan::Channel::lora(
            868_100_000,
            125,
            vec![7, 8],
        )])
        .unwrap();

        assert!(!is_stale("radio_0", &config));
        assert!(is_stale("radio_1", &config));
        assert!(!is_stale("chan_multiSF_0", &config));
        assert!(is_stale("chan_multiSF_1", &config));
        for key in ["chan_Lora_std", "chan_FSK", "tx_lut_1", "radio_x", "chan_multiSF_"] {
            assert!(!is_stale(key, &config), "{key}");
        }
    }

    #[test]
    fn test_disable_leaves_unindexed_entries_alone() {
        let mut doc = ConfigDocument::from_value(serde_json::json!({
            "SX1301_conf": {
                "radio_0": { "enable": true, "freq": 0 },
                "radio_1": "unused",
                "radio_aux": { "enable": true },
                "tx_lut_3": { "enable": true },
                "chan_Lora_std": {},
                "chan_FSK": {}
            },
            "gateway_conf": {}
        }))
        .unwrap();
        let config = pf_plan::plan_gateway(&[]).unwrap();

        handle_stale(&mut doc, &config, StalePolicy::Disable).unwrap();

        let section = doc.root()[SX1301_SECTION].clone();
        assert_eq!(section["radio_0"]["enable"], Value::Bool(false));
        assert_eq!(section["radio_1"], Value::from("unused"));
        assert_eq!(section["radio_aux"]["enable"], Value::Bool(true));
        assert_eq!(section["tx_lut_3"]["enable"], Value::Bool(true));
    }
}
