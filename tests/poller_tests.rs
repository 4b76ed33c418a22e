//! Sweep behavior tests driven through a scripted mock channel.

use meterlink::bus::mock::MockChannel;
use meterlink::frame::{additive_checksum, rtu};
use meterlink::table::electric;
use meterlink::{
    DeviceAddress, DeviceRegistry, MeterFamily, MeterKind, PollTimings, Poller, RowRange,
    SampleQueue,
};
use std::sync::Arc;
use std::time::Duration;

const DEVICE_A: [u8; 6] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
const DEVICE_B: [u8; 6] = [0x11, 0x12, 0x13, 0x14, 0x15, 0x16];

fn fast_timings() -> PollTimings {
    PollTimings {
        rx_timeout: Duration::from_millis(50),
        poll_period: Duration::from_millis(50),
        inter_command_delay: Duration::from_millis(1),
    }
}

fn rtu_response(slave_id: u8, payload: &[u8]) -> Vec<u8> {
    let mut buf = vec![slave_id, 0x04, payload.len() as u8];
    buf.extend_from_slice(payload);
    let crc = rtu::crc16(&buf);
    buf.push((crc >> 8) as u8);
    buf.push(crc as u8);
    buf
}

fn delimited_response(device: &[u8; 6], command: u16, payload: &[u8]) -> Vec<u8> {
    let mut buf = vec![0x68];
    buf.extend_from_slice(device);
    buf.push(0x68);
    buf.push(0x81);
    buf.push(2 + payload.len() as u8);
    buf.push((command >> 8) as u8);
    buf.push(command as u8);
    buf.extend_from_slice(payload);
    let checksum = additive_checksum(&buf);
    buf.push(checksum);
    buf.push(0x16);
    buf
}

/// A device failing mid-read contributes nothing, and the sweep still
/// reaches the devices after it.
#[tokio::test]
async fn failing_device_is_isolated_from_the_sweep() {
    let channel = MockChannel::new();
    let queue = SampleQueue::bounded(16);
    let range = RowRange::new(electric::DATE, electric::TIME);

    // Device A: first command answers, second comes back corrupt.
    channel.push_response(&delimited_response(&DEVICE_A, 0xC010, &[0x38, 0x53, 0x39, 0x56]));
    let mut corrupt = delimited_response(&DEVICE_A, 0xC011, &[0x41, 0x51, 0x38]);
    let len = corrupt.len();
    corrupt[len - 2] = corrupt[len - 2].wrapping_add(1);
    channel.push_response(&corrupt);

    // Device B: both commands answer.
    channel.push_response(&delimited_response(&DEVICE_B, 0xC010, &[0x38, 0x53, 0x39, 0x56]));
    channel.push_response(&delimited_response(&DEVICE_B, 0xC011, &[0x41, 0x51, 0x38]));

    let devices = Arc::new(DeviceRegistry::new(vec![
        DeviceAddress::Extended(DEVICE_A),
        DeviceAddress::Extended(DEVICE_B),
    ]));
    let mut poller = Poller::new(
        MeterFamily::electric(),
        channel.clone(),
        devices,
        queue.clone(),
        fast_timings(),
    )
    .with_range(range);

    let enqueued = poller.sweep().await;
    assert_eq!(enqueued, 1);

    let sample = queue.get(Duration::from_millis(10)).await.unwrap();
    assert_eq!(sample.meter, MeterKind::Electric);
    assert_eq!(sample.device, DeviceAddress::Extended(DEVICE_B));
    assert!(queue.is_empty().await);
}

/// The register family covers a whole contiguous range in one exchange.
#[tokio::test]
async fn water_sweep_reads_the_range_in_one_exchange() {
    let channel = MockChannel::new();
    let queue = SampleQueue::bounded(16);
    let family = MeterFamily::water();
    let count = family.table.span_size(0, family.table.len() as u16 - 1);

    let payload: Vec<u8> = (0..2 * count).map(|i| i as u8).collect();
    channel.push_response(&rtu_response(1, &payload));

    let devices = Arc::new(DeviceRegistry::new(vec![DeviceAddress::Slave(1)]));
    let mut poller = Poller::new(family, channel.clone(), devices, queue.clone(), fast_timings());

    let enqueued = poller.sweep().await;
    assert_eq!(enqueued, 1);

    let requests = channel.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0], rtu::build_request(1, 0x0000, count).to_vec());

    let sample = queue.get(Duration::from_millis(10)).await.unwrap();
    assert_eq!(&sample.payload[..], &payload[..]);
}

/// A silent device is skipped; the next one is still polled this sweep.
#[tokio::test]
async fn silent_device_does_not_block_the_next() {
    let channel = MockChannel::new();
    let queue = SampleQueue::bounded(16);
    let family = MeterFamily::water();
    let count = family.table.span_size(0, family.table.len() as u16 - 1);

    channel.push_silence();
    let payload: Vec<u8> = vec![0xAB; 2 * count as usize];
    channel.push_response(&rtu_response(2, &payload));

    let devices = Arc::new(DeviceRegistry::new(vec![
        DeviceAddress::Slave(1),
        DeviceAddress::Slave(2),
    ]));
    let mut poller = Poller::new(family, channel.clone(), devices, queue.clone(), fast_timings());

    let enqueued = poller.sweep().await;
    assert_eq!(enqueued, 1);
    assert_eq!(channel.requests().len(), 2);

    let sample = queue.get(Duration::from_millis(10)).await.unwrap();
    assert_eq!(sample.device, DeviceAddress::Slave(2));
}

/// Multi-command reads land each payload at its offset in the sample.
#[tokio::test]
async fn delimited_payloads_are_assembled_in_row_order() {
    let channel = MockChannel::new();
    let queue = SampleQueue::bounded(16);
    let range = RowRange::new(electric::DATE, electric::TIME);

    channel.push_response(&delimited_response(&DEVICE_A, 0xC010, &[0x38, 0x53, 0x39, 0x56]));
    channel.push_response(&delimited_response(&DEVICE_A, 0xC011, &[0x41, 0x51, 0x38]));

    let devices = Arc::new(DeviceRegistry::new(vec![DeviceAddress::Extended(DEVICE_A)]));
    let mut poller = Poller::new(
        MeterFamily::electric(),
        channel.clone(),
        devices,
        queue.clone(),
        fast_timings(),
    )
    .with_range(range);

    assert_eq!(poller.sweep().await, 1);

    let sample = queue.get(Duration::from_millis(10)).await.unwrap();
    assert_eq!(
        &sample.payload[..],
        &[0x38, 0x53, 0x39, 0x56, 0x41, 0x51, 0x38]
    );
    assert_eq!(sample.range, range);
}

/// Device list changes take effect at the next sweep.
#[tokio::test]
async fn registry_is_reread_each_sweep() {
    let channel = MockChannel::new();
    let queue = SampleQueue::bounded(16);
    let family = MeterFamily::water();
    let count = family.table.span_size(0, family.table.len() as u16 - 1);
    let payload: Vec<u8> = vec![0x00; 2 * count as usize];

    channel.push_response(&rtu_response(1, &payload));
    channel.push_response(&rtu_response(9, &payload));

    let devices = Arc::new(DeviceRegistry::new(vec![DeviceAddress::Slave(1)]));
    let mut poller = Poller::new(
        family,
        channel.clone(),
        Arc::clone(&devices),
        queue.clone(),
        fast_timings(),
    );

    poller.sweep().await;
    devices.set(vec![DeviceAddress::Slave(9)]);
    poller.sweep().await;

    let requests = channel.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0][0], 1);
    assert_eq!(requests[1][0], 9);
}
