use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use meterlink::{
    decode, init_logger, DeviceRegistry, FamilyConfig, GatewayConfig, LogSink, MeterFamily,
    MeterKind, PollTimings, Poller, PublishSink, QueueError, ReadingDocument, SampleQueue,
    SerialChannel,
};

#[derive(Parser)]
#[command(name = "meterlink")]
#[command(about = "Serial-bus master for electric and water utility meters")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the configured meters and export readings.
    Run {
        /// Path to a JSON configuration file; defaults are used without one.
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Print the effective default configuration as JSON-ish debug output.
    PrintConfig,
}

/// Spawns a poller task for one family. A construction failure disables
/// only this family; the process keeps running for the other.
fn start_family(
    kind: MeterKind,
    family_config: &FamilyConfig,
    queue: &SampleQueue,
) -> Option<tokio::task::JoinHandle<()>> {
    let family = MeterFamily::for_kind(kind);

    let devices = match family_config.device_addresses(kind) {
        Ok(devices) => devices,
        Err(err) => {
            error!("{kind}: {err}; family disabled");
            return None;
        }
    };
    if devices.is_empty() {
        warn!("{kind}: no devices configured; family disabled");
        return None;
    }

    let channel = match SerialChannel::open(
        &family_config.port,
        family_config.baudrate,
        family_config.parity,
    ) {
        Ok(channel) => channel,
        Err(err) => {
            error!("{kind}: {err}; family disabled");
            return None;
        }
    };

    let timings = PollTimings {
        rx_timeout: family_config.rx_timeout(),
        poll_period: family_config.poll_period(),
        inter_command_delay: family_config.inter_command_delay(),
    };

    let poller = Poller::new(
        family,
        channel,
        Arc::new(DeviceRegistry::new(devices)),
        queue.clone(),
        timings,
    );
    info!(
        "{kind}: polling {} devices on {}",
        family_config.devices.len(),
        family_config.port
    );
    Some(tokio::spawn(poller.run()))
}

/// Drains the queue, decodes each sample, and publishes the reading
/// document. An empty queue tick is a normal condition.
async fn export_loop(queue: SampleQueue, sink: impl PublishSink) {
    loop {
        match queue.get(Duration::from_millis(1000)).await {
            Ok(sample) => {
                let family = MeterFamily::for_kind(sample.meter);
                let fields = decode(&family, &sample);
                let document = ReadingDocument::new(&sample, fields);
                match document.to_json() {
                    Ok(json) => {
                        if let Err(err) = sink.publish(&document.topic(), json.as_bytes()).await {
                            warn!("publish failed: {err}");
                        }
                    }
                    Err(err) => warn!("export failed: {err}"),
                }
            }
            Err(QueueError::Empty) => continue,
            Err(QueueError::Unavailable) => break,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { config } => {
            let config = match config {
                Some(path) => GatewayConfig::load(&path)
                    .with_context(|| format!("loading config from {path}"))?,
                None => GatewayConfig::default(),
            };

            let queue = SampleQueue::bounded(config.queue_capacity);
            let mut started = 0;
            if let Some(family_config) = &config.electric {
                if start_family(MeterKind::Electric, family_config, &queue).is_some() {
                    started += 1;
                }
            }
            if let Some(family_config) = &config.water {
                if start_family(MeterKind::Water, family_config, &queue).is_some() {
                    started += 1;
                }
            }
            anyhow::ensure!(started > 0, "no meter family could be started");

            export_loop(queue, LogSink).await;
        }
        Commands::PrintConfig => {
            println!("{:#?}", GatewayConfig::default());
        }
    }

    Ok(())
}
