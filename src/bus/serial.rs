//! Serial channel implementation over `tokio-serial`.

use async_trait::async_trait;
use log::{debug, trace};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::{timeout, Instant};
use tokio_serial::{SerialPort, SerialPortBuilderExt};

use crate::bus::Channel;
use crate::config::Parity;
use crate::constants::MAX_RESPONSE_SIZE;
use crate::error::ChannelError;

/// A half-duplex serial endpoint owned exclusively by one poller.
pub struct SerialChannel {
    port: tokio_serial::SerialStream,
    name: String,
}

impl SerialChannel {
    /// Opens the serial port with 8 data bits and one stop bit. Baud rate
    /// and parity come from the family configuration; framing mismatches
    /// against the physical bus are the operator's responsibility.
    pub fn open(path: &str, baudrate: u32, parity: Parity) -> Result<Self, ChannelError> {
        let port = tokio_serial::new(path, baudrate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(parity.into())
            .open_native_async()
            .map_err(|e| ChannelError::Open(e.to_string()))?;

        Ok(SerialChannel {
            port,
            name: path.to_string(),
        })
    }
}

#[async_trait]
impl Channel for SerialChannel {
    async fn transceive(
        &mut self,
        request: &[u8],
        max_len: usize,
        rx_timeout: Duration,
    ) -> Result<Vec<u8>, ChannelError> {
        // Drop any stale bytes before this exchange begins.
        self.port
            .clear(tokio_serial::ClearBuffer::Input)
            .map_err(|e| ChannelError::Io(e.to_string()))?;

        trace!("{} tx {}", self.name, hex::encode(request));
        self.port
            .write_all(request)
            .await
            .map_err(|e| ChannelError::Write(e.to_string()))?;
        self.port
            .flush()
            .await
            .map_err(|e| ChannelError::Write(e.to_string()))?;

        let limit = max_len.min(MAX_RESPONSE_SIZE);
        let mut buf = vec![0u8; limit];
        let mut filled = 0usize;
        let deadline = Instant::now() + rx_timeout;

        while filled < limit {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match timeout(remaining, self.port.read(&mut buf[filled..])).await {
                Err(_) => break,
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => filled += n,
                Ok(Err(e)) => return Err(ChannelError::Io(e.to_string())),
            }
        }

        if filled == 0 {
            debug!("{} no response within {:?}", self.name, rx_timeout);
            return Err(ChannelError::NoResponse);
        }

        buf.truncate(filled);
        trace!("{} rx {}", self.name, hex::encode(&buf));
        Ok(buf)
    }
}
