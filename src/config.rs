//! # Gateway Configuration
//!
//! Per-family serial settings, device identity lists, timing, and queue
//! capacity. Read once at startup; the defaults mirror the deployed
//! gateway (electric meters at 1200 baud with even parity, water meters at
//! 9600 baud without parity). Device lists may be swapped at runtime
//! through the poller's registry, but only between sweeps.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::constants::{
    DEFAULT_INTER_COMMAND_DELAY_MS, DEFAULT_POLL_PERIOD_MS, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_RX_TIMEOUT_MS, DEVICE_ADDRESS_LEN,
};
use crate::error::ConfigError;
use crate::sample::{DeviceAddress, MeterKind};

/// Serial parity setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    None,
    Even,
    Odd,
}

impl From<Parity> for tokio_serial::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => tokio_serial::Parity::None,
            Parity::Even => tokio_serial::Parity::Even,
            Parity::Odd => tokio_serial::Parity::Odd,
        }
    }
}

/// Configuration for one meter family's serial endpoint and schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct FamilyConfig {
    /// Serial port path, e.g. `/dev/ttyUSB0`.
    pub port: String,
    pub baudrate: u32,
    pub parity: Parity,
    /// Device identities: decimal slave ids for the water family,
    /// 12-hex-digit addresses for the electric family.
    pub devices: Vec<String>,
    #[serde(default = "default_rx_timeout_ms")]
    pub rx_timeout_ms: u64,
    #[serde(default = "default_poll_period_ms")]
    pub poll_period_ms: u64,
    #[serde(default = "default_inter_command_delay_ms")]
    pub inter_command_delay_ms: u64,
}

fn default_rx_timeout_ms() -> u64 {
    DEFAULT_RX_TIMEOUT_MS
}

fn default_poll_period_ms() -> u64 {
    DEFAULT_POLL_PERIOD_MS
}

fn default_inter_command_delay_ms() -> u64 {
    DEFAULT_INTER_COMMAND_DELAY_MS
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl FamilyConfig {
    pub fn rx_timeout(&self) -> Duration {
        Duration::from_millis(self.rx_timeout_ms)
    }

    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_period_ms)
    }

    pub fn inter_command_delay(&self) -> Duration {
        Duration::from_millis(self.inter_command_delay_ms)
    }

    /// Parses the configured identity strings into bus addresses of the
    /// kind the family's framing expects.
    pub fn device_addresses(&self, kind: MeterKind) -> Result<Vec<DeviceAddress>, ConfigError> {
        self.devices
            .iter()
            .map(|identity| parse_device(kind, identity))
            .collect()
    }
}

fn parse_device(kind: MeterKind, identity: &str) -> Result<DeviceAddress, ConfigError> {
    match kind {
        MeterKind::Water => identity
            .parse::<u8>()
            .map(DeviceAddress::Slave)
            .map_err(|e| ConfigError::BadDevice {
                identity: identity.to_string(),
                reason: e.to_string(),
            }),
        MeterKind::Electric => {
            let bytes = hex::decode(identity).map_err(|e| ConfigError::BadDevice {
                identity: identity.to_string(),
                reason: e.to_string(),
            })?;
            let addr: [u8; DEVICE_ADDRESS_LEN] =
                bytes.try_into().map_err(|_| ConfigError::BadDevice {
                    identity: identity.to_string(),
                    reason: format!("expected {} bytes", DEVICE_ADDRESS_LEN),
                })?;
            Ok(DeviceAddress::Extended(addr))
        }
    }
}

/// Top-level gateway configuration. A family left out of the file is not
/// polled.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub electric: Option<FamilyConfig>,
    pub water: Option<FamilyConfig>,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            electric: Some(FamilyConfig {
                port: "/dev/ttyUSB0".to_string(),
                baudrate: 1200,
                parity: Parity::Even,
                devices: vec!["010203040506".to_string(), "111213141516".to_string()],
                rx_timeout_ms: DEFAULT_RX_TIMEOUT_MS,
                poll_period_ms: DEFAULT_POLL_PERIOD_MS,
                inter_command_delay_ms: DEFAULT_INTER_COMMAND_DELAY_MS,
            }),
            water: Some(FamilyConfig {
                port: "/dev/ttyUSB1".to_string(),
                baudrate: 9600,
                parity: Parity::None,
                devices: vec!["1".to_string(), "2".to_string()],
                rx_timeout_ms: DEFAULT_RX_TIMEOUT_MS,
                poll_period_ms: DEFAULT_POLL_PERIOD_MS,
                inter_command_delay_ms: DEFAULT_INTER_COMMAND_DELAY_MS,
            }),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl GatewayConfig {
    /// Loads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_identity_is_decimal_slave_id() {
        let addr = parse_device(MeterKind::Water, "11").unwrap();
        assert_eq!(addr, DeviceAddress::Slave(11));
    }

    #[test]
    fn electric_identity_is_hex_address() {
        let addr = parse_device(MeterKind::Electric, "0102030a0b0c").unwrap();
        assert_eq!(
            addr,
            DeviceAddress::Extended([0x01, 0x02, 0x03, 0x0A, 0x0B, 0x0C])
        );
    }

    #[test]
    fn short_electric_identity_rejected() {
        assert!(parse_device(MeterKind::Electric, "0102").is_err());
    }
}
