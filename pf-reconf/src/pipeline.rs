//! Apply pipeline
//!
//! load document → plan radios → merge → save → restart. Any failure stops
//! the pipeline, so a document is only saved, and the packet-forwarder only
//! restarted, once the whole plan has been merged.

use std::path::PathBuf;

use anyhow::Context;
use pf_config::{merge_with, ConfigDocument, MergeOptions};
use pf_plan::plan_gateway;
use tracing::info;

use crate::packet::ConfigPacket;
use crate::restart::RestartInvoker;

/// Apply options
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Packet-forwarder configuration file
    pub config_path: PathBuf,
    /// Merge options
    pub merge: MergeOptions,
    /// Merge only; skip save and restart
    pub dry_run: bool,
}

/// Result of a successful apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Number of radios in the new plan
    pub radios: usize,
    /// Number of channel slots in the new plan
    pub channels: usize,
    /// Merged document text (dry run only)
    pub preview: Option<String>,
}

/// Apply a channel plan to the packet-forwarder
pub fn apply(
    packet: &ConfigPacket,
    options: &ApplyOptions,
    restarter: &dyn RestartInvoker,
) -> anyhow::Result<ApplyOutcome> {
    let path = &options.config_path;

    let mut doc = ConfigDocument::load(path)
        .with_context(|| format!("load packet-forwarder configuration {}", path.display()))?;

    let plan = plan_gateway(&packet.channels)
        .with_context(|| format!("get gateway configuration for {}", packet.gateway_id))?;

    merge_with(&mut doc, packet.gateway_id, &plan, options.merge)
        .with_context(|| format!("merge configuration into {}", path.display()))?;

    let mut outcome = ApplyOutcome {
        radios: plan.radios.len(),
        channels: plan.channel_count(),
        preview: None,
    };

    if options.dry_run {
        info!("Dry run, leaving {} untouched", path.display());
        outcome.preview = Some(doc.to_string_pretty()?);
        return Ok(outcome);
    }

    doc.save(path)
        .with_context(|| format!("save packet-forwarder configuration {}", path.display()))?;
    info!("Wrote packet-forwarder configuration {}", path.display());

    restarter
        .restart()
        .context("invoke packet-forwarder restart")?;
    info!("Packet-forwarder restarted");

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::fs;
    use std::path::Path;

    use pf_config::{GatewayId, StalePolicy};
    use pf_plan::Channel;
    use serde_json::{json, Value};

    use super::*;
    use crate::restart::RestartError;

    const GLOBAL_CONF: &str = r#"{
    "SX1301_conf": {
        "radio_0": { "enable": false, "type": "SX1257", "freq": 0 }, /* first radio */
        "radio_1": { "enable": true, "type": "SX1257", "freq": 869400000 },
        "chan_multiSF_0": { "enable": false, "radio": 0, "if": 0 },
        "chan_multiSF_1": { "enable": false, "radio": 0, "if": 0 },
        "chan_multiSF_2": { "enable": true, "radio": 1, "if": 0 },
        "chan_Lora_std": { "enable": false },
        "chan_FSK": { "enable": false }
    },
    "gateway_conf": { "gateway_ID": "AA555A0000000000", "serv_port_up": 1700 }
}"#;

    /// Restarter that records calls instead of running anything
    struct FakeRestart {
        calls: Cell<usize>,
        fail: bool,
    }

    impl FakeRestart {
        fn new(fail: bool) -> Self {
            Self {
                calls: Cell::new(0),
                fail,
            }
        }
    }

    impl RestartInvoker for FakeRestart {
        fn restart(&self) -> Result<(), RestartError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(RestartError::Execution {
                    command: "fake".into(),
                    cause: "exit status: 1".into(),
                });
            }
            Ok(())
        }
    }

    /// Per-test scratch copy of the configuration
    fn scratch_config(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pf-reconf-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("global_conf.json");
        fs::write(&path, contents).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    fn options(path: &Path) -> ApplyOptions {
        ApplyOptions {
            config_path: path.to_path_buf(),
            merge: MergeOptions::default(),
            dry_run: false,
        }
    }

    fn packet(channels: Vec<Channel>) -> ConfigPacket {
        ConfigPacket {
            gateway_id: GatewayId(0x0102_0304_0506_0708),
            channels,
        }
    }

    fn multi_sf(frequency: u32) -> Channel {
        Channel::lora(frequency, 125, vec![7, 8, 9, 10, 11, 12])
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_apply_saves_and_restarts() {
        let path = scratch_config("apply", GLOBAL_CONF);
        let restarter = FakeRestart::new(false);
        let packet = packet(vec![
            multi_sf(868_500_000),
            multi_sf(868_100_000),
            Channel::lora(868_300_000, 125, vec![7]),
        ]);

        let outcome = apply(&packet, &options(&path), &restarter).unwrap();

        assert_eq!(
            outcome,
            ApplyOutcome {
                radios: 1,
                channels: 3,
                preview: None
            }
        );
        assert_eq!(restarter.calls.get(), 1);

        let saved = read_json(&path);
        assert_eq!(saved["SX1301_conf"]["radio_0"]["freq"], json!(868_500_000));
        assert_eq!(saved["SX1301_conf"]["radio_0"]["type"], json!("SX1257"));
        assert_eq!(saved["SX1301_conf"]["chan_multiSF_0"]["if"], json!(-400_000));
        assert_eq!(saved["SX1301_conf"]["chan_Lora_std"]["if"], json!(-200_000));
        assert_eq!(saved["gateway_conf"]["gateway_ID"], json!("0102030405060708"));
        assert_eq!(saved["gateway_conf"]["serv_port_up"], json!(1700));

        cleanup(&path);
    }

    #[test]
    fn test_plan_error_leaves_document_and_skips_restart() {
        let path = scratch_config("plan-error", GLOBAL_CONF);
        let restarter = FakeRestart::new(false);
        let packet = packet(vec![
            Channel::fsk(868_100_000, 125, 50_000),
            Channel::fsk(868_300_000, 125, 50_000),
        ]);

        let err = apply(&packet, &options(&path), &restarter).unwrap_err();

        assert!(format!("{err:#}").contains("FSK channel already configured"));
        assert_eq!(fs::read_to_string(&path).unwrap(), GLOBAL_CONF);
        assert_eq!(restarter.calls.get(), 0);

        cleanup(&path);
    }

    #[test]
    fn test_merge_error_leaves_document_and_skips_restart() {
        let contents = r#"{ "SX1301_conf": { "chan_Lora_std": {}, "chan_FSK": {} }, "gateway_conf": {} }"#;
        let path = scratch_config("merge-error", contents);
        let restarter = FakeRestart::new(false);

        let err = apply(&packet(vec![multi_sf(868_100_000)]), &options(&path), &restarter)
            .unwrap_err();

        assert!(format!("{err:#}").contains("SX1301_conf.radio_0"));
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
        assert_eq!(restarter.calls.get(), 0);

        cleanup(&path);
    }

    #[test]
    fn test_restart_failure_is_surfaced() {
        let path = scratch_config("restart-error", GLOBAL_CONF);
        let restarter = FakeRestart::new(true);

        let err = apply(&packet(vec![multi_sf(868_100_000)]), &options(&path), &restarter)
            .unwrap_err();

        assert!(format!("{err:#}").starts_with("invoke packet-forwarder restart"));
        assert_eq!(restarter.calls.get(), 1);
        assert_eq!(read_json(&path)["SX1301_conf"]["radio_0"]["enable"], json!(true));

        cleanup(&path);
    }

    #[test]
    fn test_dry_run_previews_without_side_effects() {
        let path = scratch_config("dry-run", GLOBAL_CONF);
        let restarter = FakeRestart::new(false);
        let mut opts = options(&path);
        opts.dry_run = true;

        let outcome = apply(&packet(vec![multi_sf(868_100_000)]), &opts, &restarter).unwrap();

        let preview: Value = serde_json::from_str(outcome.preview.as_deref().unwrap()).unwrap();
        assert_eq!(preview["SX1301_conf"]["radio_0"]["freq"], json!(868_500_000));
        assert_eq!(fs::read_to_string(&path).unwrap(), GLOBAL_CONF);
        assert_eq!(restarter.calls.get(), 0);

        cleanup(&path);
    }

    #[test]
    fn test_disable_stale_entries() {
        let path = scratch_config("stale", GLOBAL_CONF);
        let restarter = FakeRestart::new(false);
        let mut opts = options(&path);
        opts.merge.stale = StalePolicy::Disable;

        apply(&packet(vec![multi_sf(868_100_000)]), &opts, &restarter).unwrap();

        let saved = read_json(&path);
        assert_eq!(saved["SX1301_conf"]["radio_1"]["enable"], json!(false));
        assert_eq!(saved["SX1301_conf"]["chan_multiSF_2"]["enable"], json!(false));
        assert_eq!(saved["SX1301_conf"]["chan_multiSF_0"]["enable"], json!(true));

        cleanup(&path);
    }

    #[test]
    fn test_missing_document() {
        let restarter = FakeRestart::new(false);
        let opts = options(Path::new("/nonexistent/global_conf.json"));

        let err = apply(&packet(vec![]), &opts, &restarter).unwrap_err();

        assert!(format!("{err:#}").starts_with("load packet-forwarder configuration"));
        assert_eq!(restarter.calls.get(), 0);
    }
}
