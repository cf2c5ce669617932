//! Packet-Forwarder Reconfiguration
//!
//! Applies a gateway channel plan to a LoRa packet-forwarder: the channels are
//! packed onto the concentrator radios, merged into the packet-forwarder's
//! `global_conf.json` and the packet-forwarder is restarted.

mod packet;
mod pipeline;
mod restart;
mod settings;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pf_config::{MergeOptions, StalePolicy};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use packet::ConfigPacket;
use pipeline::{apply, ApplyOptions};
use restart::CommandRestart;
use settings::Settings;

/// Apply a channel plan to a LoRa packet-forwarder.
#[derive(Parser, Debug)]
#[command(name = "pf-reconf", version, about)]
struct Cli {
    /// Gateway configuration packet (JSON channel plan).
    #[arg(long)]
    plan: PathBuf,

    /// Settings file (defaults to $XDG_CONFIG_HOME/pf-reconf/settings.json).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Packet-forwarder configuration file override.
    #[arg(long)]
    pf_config: Option<PathBuf>,

    /// Packet-forwarder restart command override.
    #[arg(long)]
    restart_command: Option<String>,

    /// Disable radio and multi-SF entries not used by the new plan.
    #[arg(long, default_value_t = false)]
    disable_stale: bool,

    /// Print the merged configuration instead of saving it and restarting.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pf_reconf=info,pf_plan=info,pf_config=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.settings.as_deref()).context("load settings")?;
    if let Some(path) = cli.pf_config {
        settings.packet_forwarder_config = path;
    }
    if let Some(command) = cli.restart_command {
        settings.restart_command = command;
    }
    if cli.disable_stale {
        settings.stale_entries = StalePolicy::Disable;
    }

    let packet = ConfigPacket::load(&cli.plan)?;
    tracing::info!(
        "Applying {} channel(s) for gateway {} to {}",
        packet.channels.len(),
        packet.gateway_id,
        settings.packet_forwarder_config.display()
    );

    let options = ApplyOptions {
        config_path: settings.packet_forwarder_config,
        merge: MergeOptions {
            stale: settings.stale_entries,
        },
        dry_run: cli.dry_run,
    };
    let restarter = CommandRestart::new(settings.restart_command);

    let outcome = apply(&packet, &options, &restarter)?;
    if let Some(preview) = outcome.preview {
        print!("{preview}");
    }
    tracing::info!(
        "Configured {} radio(s) and {} channel(s)",
        outcome.radios,
        outcome.channels
    );

    Ok(())
}
