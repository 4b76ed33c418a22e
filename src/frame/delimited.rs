//! Delimited frame codec (electric meter family).
//!
//! Requests and responses are framed by a start byte, repeated after the
//! 6-byte device address, and a closing end byte. Integrity is an additive
//! checksum over everything before the checksum byte. The meter echoes the
//! request structure back with the payload inserted between the command
//! address and the checksum, so a response to a `payload_len`-byte command
//! is always `DELIMITED_OVERHEAD + payload_len` bytes long.

use nom::bytes::complete::{tag, take};
use nom::number::complete::{be_u16, u8 as parse_u8};
use nom::IResult;

use crate::constants::{
    COMMAND_ADDRESS_LEN, DELIMITED_OVERHEAD, DELIMITED_REQUEST_LEN, DEVICE_ADDRESS_LEN,
    FRAME_END, FRAME_START, READ_REQUEST_BYTE,
};
use crate::error::ProtocolError;
use crate::frame::additive_checksum;

/// Builds a read request for one command word against a 6-byte device
/// address.
pub fn build_request(
    device: &[u8; DEVICE_ADDRESS_LEN],
    command: u16,
) -> [u8; DELIMITED_REQUEST_LEN] {
    let mut request = [0u8; DELIMITED_REQUEST_LEN];
    request[0] = FRAME_START;
    request[1..7].copy_from_slice(device);
    request[7] = FRAME_START;
    request[8] = READ_REQUEST_BYTE;
    request[9] = COMMAND_ADDRESS_LEN;
    request[10] = (command >> 8) as u8;
    request[11] = command as u8;
    request[12] = additive_checksum(&request[..12]);
    request[13] = FRAME_END;
    request
}

/// Exact response length for a command returning `payload_len` bytes.
pub fn expected_len(payload_len: usize) -> usize {
    DELIMITED_OVERHEAD + payload_len
}

/// Validates a response read from the channel.
///
/// Accepted only when exactly `expected` bytes arrived, the frame opens with
/// the start byte and closes with the end byte, and the additive checksum
/// over everything before the trailing two bytes matches the carried
/// checksum. All failures are per-exchange conditions.
pub fn validate_response(buf: &[u8], expected: usize) -> Result<(), ProtocolError> {
    if buf.len() != expected || buf.len() < DELIMITED_OVERHEAD {
        return Err(ProtocolError::Truncated {
            expected,
            actual: buf.len(),
        });
    }

    if buf[0] != FRAME_START {
        return Err(ProtocolError::BadDelimiter(buf[0]));
    }
    let last = buf[buf.len() - 1];
    if last != FRAME_END {
        return Err(ProtocolError::BadDelimiter(last));
    }

    let calculated = additive_checksum(&buf[..buf.len() - 2]);
    let received = buf[buf.len() - 2];
    if calculated != received {
        return Err(ProtocolError::ChecksumMismatch {
            received,
            calculated,
        });
    }

    Ok(())
}

/// Structured view of a validated response.
#[derive(Debug, PartialEq, Eq)]
pub struct Response<'a> {
    pub device: &'a [u8],
    pub control: u8,
    pub command: u16,
    pub payload: &'a [u8],
    pub checksum: u8,
}

fn parse_response_inner(input: &[u8]) -> IResult<&[u8], Response<'_>> {
    let (input, _) = tag(&[FRAME_START][..])(input)?;
    let (input, device) = take(DEVICE_ADDRESS_LEN)(input)?;
    let (input, _) = tag(&[FRAME_START][..])(input)?;
    let (input, control) = parse_u8(input)?;
    let (input, length) = parse_u8(input)?;
    let (input, command) = be_u16(input)?;
    let payload_len = (length as usize).saturating_sub(COMMAND_ADDRESS_LEN as usize);
    let (input, payload) = take(payload_len)(input)?;
    let (input, checksum) = parse_u8(input)?;
    let (input, _) = tag(&[FRAME_END][..])(input)?;
    Ok((
        input,
        Response {
            device,
            control,
            command,
            payload,
            checksum,
        },
    ))
}

/// Destructures an already-validated response into its fields.
pub fn parse_response(buf: &[u8]) -> Result<Response<'_>, ProtocolError> {
    match parse_response_inner(buf) {
        Ok((_, response)) => Ok(response),
        Err(_) => Err(ProtocolError::Truncated {
            expected: DELIMITED_OVERHEAD,
            actual: buf.len(),
        }),
    }
}
