//! # Export Boundary
//!
//! Turns decoded samples into the JSON reading document consumed
//! downstream, and defines the publish-sink seam the export loop hands
//! documents to. Transports (MQTT or otherwise) live outside this crate;
//! [`LogSink`] lets the binary run standalone.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::decode::DecodedField;
use crate::error::MeterError;
use crate::logging::log_info;
use crate::sample::{MeterKind, Sample};

/// The stable exported artifact: meter kind, device identity, and the
/// ordered decoded fields.
#[derive(Debug, Serialize)]
pub struct ReadingDocument {
    pub meter: MeterKind,
    pub slave: String,
    pub ts: DateTime<Utc>,
    pub regs: Vec<DecodedField>,
}

impl ReadingDocument {
    pub fn new(sample: &Sample, fields: Vec<DecodedField>) -> Self {
        ReadingDocument {
            meter: sample.meter,
            slave: sample.device.to_string(),
            ts: Utc::now(),
            regs: fields,
        }
    }

    pub fn to_json(&self) -> Result<String, MeterError> {
        serde_json::to_string(self).map_err(|e| MeterError::Export(e.to_string()))
    }

    /// Topic the document is published under.
    pub fn topic(&self) -> String {
        format!("meters/{}/{}", self.meter, self.slave)
    }
}

/// Outbound publish seam. Implementations are external collaborators; the
/// core only produces documents.
#[async_trait]
pub trait PublishSink: Send + Sync {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), MeterError>;
}

/// Sink that writes documents to the log. Used when no transport is
/// configured.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl PublishSink for LogSink {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), MeterError> {
        log_info(&format!(
            "{topic}: {}",
            String::from_utf8_lossy(payload)
        ));
        Ok(())
    }
}
