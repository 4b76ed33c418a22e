//! # Serial Bus Channel
//!
//! The channel layer owns one half-duplex serial endpoint per meter family
//! and exposes a single operation: flush stale input, write a request frame,
//! then read up to a bounded number of bytes within a timeout. It carries no
//! knowledge of addresses, checksums, or table rows.

pub mod mock;
pub mod serial;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ChannelError;

/// Byte transport with a timeout contract.
///
/// `transceive` performs one complete half-duplex exchange. Any bytes left
/// over from a previous, possibly failed, exchange are discarded before the
/// request goes out, so a stale response can never be read as the current
/// one. The returned buffer holds whatever arrived before the deadline, up
/// to `max_len` bytes; an empty wire is [`ChannelError::NoResponse`].
#[async_trait]
pub trait Channel: Send {
    async fn transceive(
        &mut self,
        request: &[u8],
        max_len: usize,
        timeout: Duration,
    ) -> Result<Vec<u8>, ChannelError>;
}

pub use serial::SerialChannel;
