//! # Frame Codecs
//!
//! Request construction and response validation for the two wire-frame
//! families. Both codecs share the same contract: build a fixed-size request
//! on the stack, and accept a response only when its length, delimiters, and
//! integrity check all agree with what the request implies. Neither codec
//! touches the serial channel or interprets payload contents.

pub mod delimited;
pub mod rtu;

/// Additive checksum, modulo 256, over a byte slice.
pub fn additive_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}
