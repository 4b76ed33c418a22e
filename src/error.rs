//! # Error Handling
//!
//! This module defines the error types used throughout the meterlink crate.
//! Errors are layered the way failures actually occur on the bus: transport
//! errors from the serial channel, integrity errors from frame validation,
//! queue errors from the bounded sample queue, and configuration errors at
//! construction time. Everything folds into the top-level [`MeterError`].

use thiserror::Error;

/// Transport-layer errors raised by a [`crate::bus::Channel`].
///
/// These are per-exchange failures. The poller resolves all of them by
/// skipping the current device and moving on with the sweep.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The channel rejected the request bytes.
    #[error("write failed: {0}")]
    Write(String),

    /// Nothing arrived before the response timeout expired.
    #[error("no response within timeout")]
    NoResponse,

    /// An I/O error occurred while reading the response.
    #[error("channel I/O error: {0}")]
    Io(String),

    /// The serial endpoint could not be opened.
    #[error("serial port error: {0}")]
    Open(String),
}

/// Integrity-layer errors raised by the frame codecs.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Fewer bytes arrived than the expected response length.
    #[error("truncated response: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Recomputed CRC16 disagrees with the trailing CRC bytes.
    #[error("CRC mismatch: received {received:#06x}, calculated {calculated:#06x}")]
    CrcMismatch { received: u16, calculated: u16 },

    /// Recomputed additive checksum disagrees with the carried checksum.
    #[error("checksum mismatch: received {received:#04x}, calculated {calculated:#04x}")]
    ChecksumMismatch { received: u8, calculated: u8 },

    /// A start or end delimiter byte is missing or wrong.
    #[error("bad frame delimiter: {0:#04x}")]
    BadDelimiter(u8),
}

/// Errors raised by the bounded sample queue.
#[derive(Debug, Error)]
pub enum QueueError {
    /// No sample arrived before the receive timeout. Expected and handled
    /// silently by the polling consumer.
    #[error("queue empty")]
    Empty,

    /// The queue has been closed and accepts no further samples.
    #[error("queue unavailable")]
    Unavailable,
}

/// Construction-time errors. Fatal to the affected subsystem only; the
/// process logs and continues without polling for that family.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("cannot read config: {0}")]
    Io(String),

    /// Configuration file could not be parsed.
    #[error("cannot parse config: {0}")]
    Parse(String),

    /// A device identity string does not fit the family's address format.
    #[error("bad device identity {identity:?}: {reason}")]
    BadDevice { identity: String, reason: String },

    /// A row range does not exist in the family's register table.
    #[error("row range {start}..={stop} outside table of {len} rows")]
    BadRange { start: u16, stop: u16, len: usize },

    /// A read group is larger than the sample buffer allows.
    #[error("read group of {bytes} bytes exceeds sample buffer of {max}")]
    GroupTooLarge { bytes: usize, max: usize },
}

/// Top-level error type for the meterlink crate.
#[derive(Debug, Error)]
pub enum MeterError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Serialization of an exported document failed.
    #[error("export error: {0}")]
    Export(String),
}
