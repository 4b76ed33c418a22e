//! Protocol Constants
//!
//! This module defines the wire-format and timing constants shared by the
//! two frame families and the polling scheduler.

// ----------------------------------------------------------------------------
// Delimited frame family (electric meters)
// ----------------------------------------------------------------------------

/// Start delimiter, present at offset 0 and again after the device address.
pub const FRAME_START: u8 = 0x68;

/// End delimiter, last byte of every frame.
pub const FRAME_END: u8 = 0x16;

/// Control byte for a read request.
pub const READ_REQUEST_BYTE: u8 = 0x01;

/// Length of the command-address field carried in a read request.
pub const COMMAND_ADDRESS_LEN: u8 = 0x02;

/// Device address width on the delimited bus.
pub const DEVICE_ADDRESS_LEN: usize = 6;

/// Total length of a delimited read request.
pub const DELIMITED_REQUEST_LEN: usize = 14;

/// Response overhead: start + address + start + control + length +
/// command address + checksum + end.
pub const DELIMITED_OVERHEAD: usize = 14;

/// Offset of the first payload byte in a validated delimited response.
pub const DELIMITED_PAYLOAD_OFFSET: usize = 12;

/// Constant subtracted from every payload byte during decoding. Responses
/// carry payload bytes offset by this value on the wire.
pub const PAYLOAD_MASK: u8 = 0x33;

// ----------------------------------------------------------------------------
// Register frame family (water meters)
// ----------------------------------------------------------------------------

/// Function code for reading input registers.
pub const READ_INPUT_FUNCTION: u8 = 0x04;

/// Total length of a register read request.
pub const RTU_REQUEST_LEN: usize = 8;

/// Response overhead: address + function + byte count + 2-byte CRC.
pub const RTU_OVERHEAD: usize = 5;

/// Offset of the first payload byte in a validated register response
/// (address, function, and byte-count header are skipped).
pub const RTU_PAYLOAD_OFFSET: usize = 3;

// ----------------------------------------------------------------------------
// Buffers and timing defaults
// ----------------------------------------------------------------------------

/// Upper bound on a single response read.
pub const MAX_RESPONSE_SIZE: usize = 1024;

/// Upper bound on an assembled sample payload.
pub const MAX_SAMPLE_PAYLOAD: usize = 128;

/// Default response timeout per exchange, in milliseconds.
pub const DEFAULT_RX_TIMEOUT_MS: u64 = 1000;

/// Default idle interval between sweeps, in milliseconds.
pub const DEFAULT_POLL_PERIOD_MS: u64 = 5000;

/// Default turn-around delay between commands to the same device,
/// in milliseconds.
pub const DEFAULT_INTER_COMMAND_DELAY_MS: u64 = 50;

/// Default capacity of the bounded sample queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 128;
