//! # Polling Scheduler
//!
//! One poller per device family walks the configured devices and reads the
//! family's row range from each, one validated exchange at a time. The water
//! family covers a contiguous register range in a single exchange; the
//! electric family issues one command per row and observes a turn-around
//! delay between commands on the same device. Every fully-read device
//! contributes exactly one sample to the queue; a failure at any step
//! discards that device's partial sample and the sweep continues with the
//! next device. All transport and integrity failures are resolved here;
//! nothing propagates past the poller.

use bytes::BytesMut;
use log::{debug, error, info, warn};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::sleep;

use crate::bus::Channel;
use crate::constants::MAX_SAMPLE_PAYLOAD;
use crate::error::{ConfigError, MeterError};
use crate::family::{Framing, MeterFamily};
use crate::frame::{delimited, rtu};
use crate::queue::SampleQueue;
use crate::sample::{DeviceAddress, RowRange, Sample};

/// Timing knobs for one family's schedule.
#[derive(Debug, Clone, Copy)]
pub struct PollTimings {
    /// Response timeout per exchange.
    pub rx_timeout: Duration,
    /// Idle interval between sweeps.
    pub poll_period: Duration,
    /// Turn-around delay between commands to the same device.
    pub inter_command_delay: Duration,
}

impl Default for PollTimings {
    fn default() -> Self {
        PollTimings {
            rx_timeout: Duration::from_millis(crate::constants::DEFAULT_RX_TIMEOUT_MS),
            poll_period: Duration::from_millis(crate::constants::DEFAULT_POLL_PERIOD_MS),
            inter_command_delay: Duration::from_millis(
                crate::constants::DEFAULT_INTER_COMMAND_DELAY_MS,
            ),
        }
    }
}

/// Shared device identity list. The poller snapshots it at the start of
/// every sweep, so replacing the list takes effect on the next sweep and
/// never mid-sweep.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: RwLock<Vec<DeviceAddress>>,
}

impl DeviceRegistry {
    pub fn new(devices: Vec<DeviceAddress>) -> Self {
        DeviceRegistry {
            devices: RwLock::new(devices),
        }
    }

    /// Replaces the device list. Takes effect at the next sweep.
    pub fn set(&self, devices: Vec<DeviceAddress>) {
        *self.devices.write().unwrap() = devices;
    }

    pub fn snapshot(&self) -> Vec<DeviceAddress> {
        self.devices.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.devices.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().unwrap().is_empty()
    }
}

/// One request/response exchange within a device read, plus where its
/// payload lands in the assembled sample.
#[derive(Debug, Clone)]
pub struct ReadStep {
    pub request: Vec<u8>,
    pub expected_len: usize,
    pub payload_len: usize,
    pub sample_offset: usize,
}

/// Builds the exchange list that covers `range` on `device`.
///
/// The register family reads the whole contiguous range in one request; the
/// delimited family reads one command per row.
pub fn build_steps(
    family: &MeterFamily,
    device: &DeviceAddress,
    range: RowRange,
) -> Result<Vec<ReadStep>, ConfigError> {
    if !family.table.contains_range(range.start, range.stop) {
        return Err(ConfigError::BadRange {
            start: range.start,
            stop: range.stop,
            len: family.table.len(),
        });
    }
    let total = family.sample_len(range);
    if total > MAX_SAMPLE_PAYLOAD {
        return Err(ConfigError::GroupTooLarge {
            bytes: total,
            max: MAX_SAMPLE_PAYLOAD,
        });
    }

    match (family.framing, device) {
        (Framing::Rtu, DeviceAddress::Slave(slave_id)) => {
            let rows = family.table.span_rows(range.start, range.stop);
            let Some(start_row) = rows.first() else {
                return Err(ConfigError::BadRange {
                    start: range.start,
                    stop: range.stop,
                    len: family.table.len(),
                });
            };
            let count = family.table.span_size(range.start, range.stop);
            Ok(vec![ReadStep {
                request: rtu::build_request(*slave_id, start_row.address, count).to_vec(),
                expected_len: rtu::expected_len(count),
                payload_len: 2 * count as usize,
                sample_offset: 0,
            }])
        }
        (Framing::Delimited, DeviceAddress::Extended(address)) => {
            let mut steps = Vec::new();
            let mut sample_offset = 0usize;
            for row in family.table.span_rows(range.start, range.stop) {
                let payload_len = family.row_payload_len(row);
                steps.push(ReadStep {
                    request: delimited::build_request(address, row.address).to_vec(),
                    expected_len: delimited::expected_len(payload_len),
                    payload_len,
                    sample_offset,
                });
                sample_offset += payload_len;
            }
            Ok(steps)
        }
        (_, device) => Err(ConfigError::BadDevice {
            identity: device.to_string(),
            reason: "address kind does not match family framing".to_string(),
        }),
    }
}

/// Continuous poller for one device family over one exclusively-owned
/// channel.
pub struct Poller<C: Channel> {
    family: MeterFamily,
    channel: C,
    devices: Arc<DeviceRegistry>,
    queue: SampleQueue,
    timings: PollTimings,
    range: RowRange,
    queue_warned: bool,
}

impl<C: Channel> Poller<C> {
    pub fn new(
        family: MeterFamily,
        channel: C,
        devices: Arc<DeviceRegistry>,
        queue: SampleQueue,
        timings: PollTimings,
    ) -> Self {
        let range = family.full_range();
        Poller {
            family,
            channel,
            devices,
            queue,
            timings,
            range,
            queue_warned: false,
        }
    }

    /// Restricts polling to a sub-range of the family table.
    pub fn with_range(mut self, range: RowRange) -> Self {
        self.range = range;
        self
    }

    /// Runs sweeps forever, idling for the poll period between them.
    pub async fn run(mut self) {
        info!(
            "{} poller started: {} rows per device",
            self.family.kind,
            self.range.stop - self.range.start + 1
        );
        loop {
            self.sweep().await;
            sleep(self.timings.poll_period).await;
        }
    }

    /// One full pass over the configured devices. Returns the number of
    /// samples enqueued.
    pub async fn sweep(&mut self) -> usize {
        let devices = self.devices.snapshot();
        let mut enqueued = 0usize;

        for device in devices {
            match self.read_device(&device).await {
                Ok(sample) => {
                    match self.queue.put(sample).await {
                        Ok(()) => enqueued += 1,
                        Err(err) => {
                            // Logged once; the poller must never stall on a
                            // missing consumer.
                            if !self.queue_warned {
                                error!("{} sample dropped: {err}", self.family.kind);
                                self.queue_warned = true;
                            }
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        "{} device {device}: {err}; skipping this sweep",
                        self.family.kind
                    );
                }
            }
        }

        debug!("{} sweep complete: {enqueued} samples", self.family.kind);
        enqueued
    }

    /// Reads every step for one device and assembles the sample. Any step
    /// failure abandons the device for this sweep; partial payloads are
    /// never enqueued.
    async fn read_device(&mut self, device: &DeviceAddress) -> Result<Sample, MeterError> {
        let steps = build_steps(&self.family, device, self.range)?;
        let mut payload = BytesMut::zeroed(self.family.sample_len(self.range));
        let payload_offset = self.family.payload_offset();

        for (i, step) in steps.iter().enumerate() {
            let response = self
                .channel
                .transceive(&step.request, step.expected_len, self.timings.rx_timeout)
                .await?;

            match self.family.framing {
                Framing::Rtu => rtu::validate_response(&response, step.expected_len)?,
                Framing::Delimited => {
                    delimited::validate_response(&response, step.expected_len)?
                }
            }

            let src = &response[payload_offset..payload_offset + step.payload_len];
            payload[step.sample_offset..step.sample_offset + step.payload_len]
                .copy_from_slice(src);

            if i + 1 < steps.len() {
                sleep(self.timings.inter_command_delay).await;
            }
        }

        Ok(Sample {
            meter: self.family.kind,
            device: *device,
            range: self.range,
            payload: payload.freeze(),
        })
    }
}
