//! Gateway configuration packet
//!
//! The channel plan arrives as JSON:
//!
//! ```json
//! {
//!     "gateway_id": "b827ebfffe611a2c",
//!     "channels": [
//!         { "frequency": 868100000, "bandwidth": 125, "modulation": "LORA",
//!           "spreading_factors": [7, 8, 9, 10, 11, 12] },
//!         { "frequency": 868800000, "bandwidth": 125, "modulation": "FSK",
//!           "bitrate": 50000 }
//!     ]
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use pf_config::GatewayId;
use pf_plan::Channel;
use serde::{Deserialize, Serialize};

/// Channel plan for one gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigPacket {
    /// Gateway the plan is meant for
    pub gateway_id: GatewayId,
    /// Channels, in no particular order
    pub channels: Vec<Channel>,
}

impl ConfigPacket {
    /// Parse a packet from JSON
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid gateway configuration packet")
    }

    /// Read a packet from a file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read channel plan {}", path.display()))?;
        Self::parse(&text)
    }
}
