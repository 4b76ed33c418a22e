//! Register-read frame codec (water meter family).
//!
//! An 8-byte request addresses a contiguous run of input registers on a
//! single-byte slave id; the response carries the register bytes behind a
//! 3-byte header and ends with a CRC16 over everything before it.
//!
//! The CRC travels high byte first on this bus. That deviates from common
//! register-bus practice but matches the deployed meters.

use crc::{Crc, CRC_16_MODBUS};

use crate::constants::{RTU_OVERHEAD, RTU_REQUEST_LEN, READ_INPUT_FUNCTION};
use crate::error::ProtocolError;

const CRC16_ALG: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// CRC16 with the register-bus polynomial.
pub fn crc16(data: &[u8]) -> u16 {
    CRC16_ALG.checksum(data)
}

/// Builds a read request for `count` input registers starting at `address`
/// on slave `slave_id`.
pub fn build_request(slave_id: u8, address: u16, count: u16) -> [u8; RTU_REQUEST_LEN] {
    let mut request = [0u8; RTU_REQUEST_LEN];
    request[0] = slave_id;
    request[1] = READ_INPUT_FUNCTION;
    request[2] = (address >> 8) as u8;
    request[3] = address as u8;
    request[4] = (count >> 8) as u8;
    request[5] = count as u8;
    let crc = crc16(&request[..6]);
    request[6] = (crc >> 8) as u8;
    request[7] = crc as u8;
    request
}

/// Exact response length for a `count`-register read: the register bytes
/// plus the address/function/byte-count header and the trailing CRC.
pub fn expected_len(count: u16) -> usize {
    2 * count as usize + RTU_OVERHEAD
}

/// Validates a response read from the channel.
///
/// The response is accepted only when exactly `expected` bytes arrived and
/// the CRC16 over everything but the trailing pair equals the trailing pair
/// (high byte first). Both failures are per-exchange conditions the poller
/// resolves by skipping the device for this sweep.
pub fn validate_response(buf: &[u8], expected: usize) -> Result<(), ProtocolError> {
    if buf.len() != expected || buf.len() < RTU_OVERHEAD {
        return Err(ProtocolError::Truncated {
            expected,
            actual: buf.len(),
        });
    }

    let body = &buf[..buf.len() - 2];
    let calculated = crc16(body);
    let received = u16::from_be_bytes([buf[buf.len() - 2], buf[buf.len() - 1]]);
    if calculated != received {
        return Err(ProtocolError::CrcMismatch {
            received,
            calculated,
        });
    }

    Ok(())
}
