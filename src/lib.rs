//! # meterlink - Polling Electric and Water Utility Meters over Serial
//!
//! The meterlink crate implements a serial-bus master that periodically
//! polls remote metering devices over a shared half-duplex channel,
//! validates every response against the family's integrity check, decodes
//! the payload against a static register/command table, and hands the
//! result to a bounded sample queue for export.
//!
//! ## Features
//!
//! - Two wire-frame families: length-prefixed register reads validated by
//!   CRC16 (water meters), and start/end-delimited commands validated by an
//!   additive checksum against 6-byte device addresses (electric meters)
//! - A transceiver discipline that flushes stale input, writes the request,
//!   and reads a bounded response within a strict timeout
//! - A sweep scheduler that isolates per-device failures: a silent or
//!   corrupt meter never stalls the rest of the sweep
//! - A bounded drop-oldest sample queue between the pollers and the export
//!   consumer
//! - Table-driven decoding with per-command display formatting for the
//!   electric family
//!
//! ## Usage
//!
//! ```rust,no_run
//! use meterlink::{
//!     init_logger, DeviceRegistry, MeterFamily, Poller, PollTimings,
//!     SampleQueue, SerialChannel,
//! };
//! use meterlink::config::Parity;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), meterlink::MeterError> {
//! init_logger();
//! let queue = SampleQueue::bounded(128);
//! let channel = SerialChannel::open("/dev/ttyUSB1", 9600, Parity::None)?;
//! let devices = Arc::new(DeviceRegistry::new(vec![]));
//! let poller = Poller::new(
//!     MeterFamily::water(),
//!     channel,
//!     devices,
//!     queue.clone(),
//!     PollTimings::default(),
//! );
//! tokio::spawn(poller.run());
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod config;
pub mod constants;
pub mod decode;
pub mod error;
pub mod export;
pub mod family;
pub mod frame;
pub mod logging;
pub mod poller;
pub mod queue;
pub mod sample;
pub mod table;

pub use crate::error::{ChannelError, ConfigError, MeterError, ProtocolError, QueueError};
pub use crate::logging::{init_logger, log_debug, log_error, log_info, log_warn};

// Core types
pub use bus::{Channel, SerialChannel};
pub use config::{FamilyConfig, GatewayConfig};
pub use decode::{decode, DecodedField, FieldValue};
pub use export::{LogSink, PublishSink, ReadingDocument};
pub use family::{Framing, MeterFamily};
pub use poller::{build_steps, DeviceRegistry, PollTimings, Poller, ReadStep};
pub use queue::SampleQueue;
pub use sample::{DeviceAddress, MeterKind, RowRange, Sample};
pub use table::{RegisterRow, RegisterTable, RowFlags};
