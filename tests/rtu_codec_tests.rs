//! Unit tests for the register-read (CRC16) frame codec.

use meterlink::frame::rtu::{build_request, crc16, expected_len, validate_response};
use meterlink::ProtocolError;
use proptest::prelude::*;

/// Builds a well-formed response carrying `payload` register bytes.
fn build_response(slave_id: u8, payload: &[u8]) -> Vec<u8> {
    let mut buf = vec![slave_id, 0x04, payload.len() as u8];
    buf.extend_from_slice(payload);
    let crc = crc16(&buf);
    buf.push((crc >> 8) as u8);
    buf.push(crc as u8);
    buf
}

#[test]
fn request_carries_crc_over_first_six_bytes() {
    let request = build_request(0x01, 0x0000, 0x0014);
    assert_eq!(&request[..6], &[0x01, 0x04, 0x00, 0x00, 0x00, 0x14]);
    let crc = crc16(&request[..6]);
    assert_eq!(u16::from_be_bytes([request[6], request[7]]), crc);
}

#[test]
fn expected_len_counts_header_and_crc() {
    // 1 address + 1 function + 1 byte count + 2 CRC around the registers.
    assert_eq!(expected_len(1), 7);
    assert_eq!(expected_len(20), 45);
}

#[test]
fn well_formed_response_is_accepted() {
    let response = build_response(0x01, &[0x00, 0x00, 0x30, 0x39]);
    assert!(validate_response(&response, response.len()).is_ok());
}

#[test]
fn short_read_is_truncated() {
    let response = build_response(0x01, &[0x00, 0x00, 0x30, 0x39]);
    let err = validate_response(&response[..response.len() - 1], response.len()).unwrap_err();
    assert!(matches!(err, ProtocolError::Truncated { .. }));
}

#[test]
fn corrupt_crc_is_rejected() {
    let mut response = build_response(0x01, &[0x00, 0x00, 0x30, 0x39]);
    let last = response.len() - 1;
    response[last] ^= 0xFF;
    let err = validate_response(&response, response.len()).unwrap_err();
    assert!(matches!(err, ProtocolError::CrcMismatch { .. }));
}

proptest! {
    /// Every request's trailing pair is the CRC16 of its first six bytes.
    #[test]
    fn request_crc_round_trip(slave_id: u8, address: u16, count in 1u16..=125) {
        let request = build_request(slave_id, address, count);
        let crc = crc16(&request[..6]);
        prop_assert_eq!(u16::from_be_bytes([request[6], request[7]]), crc);
    }

    /// Any single bit flip anywhere in an accepted response is rejected.
    #[test]
    fn single_bit_flip_rejected(
        slave_id: u8,
        registers in proptest::collection::vec(any::<u16>(), 1..16),
        flip in any::<prop::sample::Index>(),
        bit in 0usize..8,
    ) {
        let payload: Vec<u8> = registers.iter().flat_map(|r| r.to_be_bytes()).collect();
        let mut response = build_response(slave_id, &payload);
        prop_assert!(validate_response(&response, response.len()).is_ok());

        let index = flip.index(response.len());
        response[index] ^= 1 << bit;
        prop_assert!(validate_response(&response, response.len()).is_err());
    }
}
