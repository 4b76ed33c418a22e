//! # Sample Decoder
//!
//! Interprets a raw [`Sample`] against its family's register table. Only
//! reportable rows produce output, in ascending row-id order. Water samples
//! decode to fixed-width big-endian integers pulled from the payload at
//! increasing offsets; electric samples are de-obfuscated per byte and then
//! rendered through the per-command display formatting. The sample's buffer
//! is never modified.

pub mod format;

use serde::Serialize;

use crate::constants::PAYLOAD_MASK;
use crate::family::{Framing, MeterFamily};
use crate::sample::Sample;

use format::{format_for, format_value};

/// A decoded value: numeric for register rows, display text for command
/// rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

/// One decoded, reportable table row.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedField {
    #[serde(rename = "key")]
    pub name: &'static str,
    pub address: u16,
    pub value: FieldValue,
}

/// Decodes every reportable row covered by the sample's row range.
pub fn decode(family: &MeterFamily, sample: &Sample) -> Vec<DecodedField> {
    let mut fields = Vec::new();
    let mut offset = 0usize;

    for row in family
        .table
        .span_rows(sample.range.start, sample.range.stop)
    {
        let len = family.row_payload_len(row);
        let Some(raw) = sample.payload.get(offset..offset + len) else {
            break;
        };
        offset += len;

        if !row.is_reportable() {
            continue;
        }

        let value = match family.framing {
            Framing::Rtu => FieldValue::Integer(be_int(raw)),
            Framing::Delimited => {
                let clear = unmask(raw);
                FieldValue::Text(format_value(format_for(row.id), &clear))
            }
        };
        fields.push(DecodedField {
            name: row.name,
            address: row.address,
            value,
        });
    }

    fields
}

/// Reverses the wire obfuscation into a scratch copy.
fn unmask(raw: &[u8]) -> Vec<u8> {
    raw.iter().map(|b| b.wrapping_sub(PAYLOAD_MASK)).collect()
}

/// Big-endian integer from a register-row payload slice. Two-register rows
/// carry signed 32-bit quantities; single registers are unsigned.
fn be_int(raw: &[u8]) -> i64 {
    match raw.len() {
        2 => u16::from_be_bytes([raw[0], raw[1]]) as i64,
        4 => i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]) as i64,
        _ => raw.iter().fold(0i64, |acc, b| (acc << 8) | *b as i64),
    }
}
