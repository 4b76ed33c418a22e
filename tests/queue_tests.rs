//! Unit tests for the bounded drop-oldest sample queue.

use bytes::Bytes;
use meterlink::{DeviceAddress, MeterKind, QueueError, RowRange, Sample, SampleQueue};
use std::time::Duration;

fn sample(tag: u8) -> Sample {
    Sample {
        meter: MeterKind::Water,
        device: DeviceAddress::Slave(tag),
        range: RowRange::new(0, 0),
        payload: Bytes::from(vec![tag]),
    }
}

fn tag_of(sample: &Sample) -> u8 {
    match sample.device {
        DeviceAddress::Slave(id) => id,
        DeviceAddress::Extended(_) => panic!("unexpected address kind"),
    }
}

#[tokio::test]
async fn fifo_order_is_preserved() {
    let queue = SampleQueue::bounded(8);
    for tag in 0..5 {
        queue.put(sample(tag)).await.unwrap();
    }
    for tag in 0..5 {
        let got = queue.get(Duration::from_millis(10)).await.unwrap();
        assert_eq!(tag_of(&got), tag);
    }
}

#[tokio::test]
async fn overflow_drops_oldest_not_newest() {
    let capacity = 4u8;
    let queue = SampleQueue::bounded(capacity as usize);

    // One more insert than the queue holds.
    for tag in 0..=capacity {
        queue.put(sample(tag)).await.unwrap();
    }

    assert_eq!(queue.len().await, capacity as usize);
    assert_eq!(queue.dropped().await, 1);

    // The oldest (tag 0) is gone; the rest drain in original order.
    for tag in 1..=capacity {
        let got = queue.get(Duration::from_millis(10)).await.unwrap();
        assert_eq!(tag_of(&got), tag);
    }
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn get_times_out_empty() {
    let queue = SampleQueue::bounded(4);
    let err = queue.get(Duration::from_millis(20)).await.unwrap_err();
    assert!(matches!(err, QueueError::Empty));
}

#[tokio::test]
async fn get_wakes_on_concurrent_put() {
    let queue = SampleQueue::bounded(4);
    let producer = queue.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        producer.put(sample(7)).await.unwrap();
    });

    let got = queue.get(Duration::from_secs(2)).await.unwrap();
    assert_eq!(tag_of(&got), 7);
}

#[tokio::test]
async fn closed_queue_rejects_put_and_drains_get() {
    let queue = SampleQueue::bounded(4);
    queue.put(sample(1)).await.unwrap();
    queue.close().await;

    let err = queue.put(sample(2)).await.unwrap_err();
    assert!(matches!(err, QueueError::Unavailable));

    // Remaining samples still drain before Unavailable surfaces.
    assert_eq!(tag_of(&queue.get(Duration::from_millis(10)).await.unwrap()), 1);
    let err = queue.get(Duration::from_millis(10)).await.unwrap_err();
    assert!(matches!(err, QueueError::Unavailable));
}
