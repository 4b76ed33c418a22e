//! # Sample Types
//!
//! A [`Sample`] is one completed poll of one device over one row range: the
//! raw concatenated payload bytes of every validated response, before any
//! decoding. Samples are created by the poller, handed to the bounded queue,
//! and consumed by the decoder.

use bytes::Bytes;
use serde::Serialize;
use std::fmt;

use crate::constants::DEVICE_ADDRESS_LEN;

/// The two metered device families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeterKind {
    Electric,
    Water,
}

impl fmt::Display for MeterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeterKind::Electric => write!(f, "electric"),
            MeterKind::Water => write!(f, "water"),
        }
    }
}

/// Addressing unit on the serial bus: a single-byte slave id for the
/// register family, or a 6-byte device address for the delimited family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAddress {
    Slave(u8),
    Extended([u8; DEVICE_ADDRESS_LEN]),
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceAddress::Slave(id) => write!(f, "{id}"),
            DeviceAddress::Extended(addr) => write!(f, "{}", hex::encode(addr)),
        }
    }
}

/// Inclusive range of register-table row ids read in one sweep of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: u16,
    pub stop: u16,
}

impl RowRange {
    pub fn new(start: u16, stop: u16) -> Self {
        RowRange { start, stop }
    }
}

/// One completed device poll. Immutable after creation; ownership moves
/// into the sample queue and then to the decoder.
#[derive(Debug, Clone)]
pub struct Sample {
    pub meter: MeterKind,
    pub device: DeviceAddress,
    pub range: RowRange,
    pub payload: Bytes,
}
