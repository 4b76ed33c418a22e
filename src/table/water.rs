//! Water meter input-register table.
//!
//! Addresses are input-register addresses read with function 0x04; sizes are
//! in 16-bit registers, so every two-register row yields a 4-byte big-endian
//! integer in the response payload.

use super::{RegisterRow, RegisterTable, RowFlags};

pub const WATER_M3: u16 = 0;
pub const CHECK_FLOW: u16 = 1;
pub const WATER_HOT_M3: u16 = 2;
pub const WATER_HOT_CHECK_FLOW: u16 = 3;
pub const GAS_M3: u16 = 4;
pub const GAS_FLOW: u16 = 5;
pub const HEAT_KW: u16 = 6;
pub const HEAT_FLOW: u16 = 7;
pub const HEAT_TEMPERATURE: u16 = 8;
pub const SERIAL_NUMBER: u16 = 9;

const ROWS: &[RegisterRow] = &[
    RegisterRow { id: WATER_M3, address: 0x0000, size: 2, flags: RowFlags::REPORT, name: "water_m3" },
    RegisterRow { id: CHECK_FLOW, address: 0x0002, size: 2, flags: RowFlags::REPORT, name: "check_flow" },
    RegisterRow { id: WATER_HOT_M3, address: 0x0004, size: 2, flags: RowFlags::REPORT, name: "water_hot_m3" },
    RegisterRow { id: WATER_HOT_CHECK_FLOW, address: 0x0006, size: 2, flags: RowFlags::REPORT, name: "water_hot_check_flow" },
    RegisterRow { id: GAS_M3, address: 0x0008, size: 2, flags: RowFlags::REPORT, name: "gas_m3" },
    RegisterRow { id: GAS_FLOW, address: 0x000A, size: 2, flags: RowFlags::empty(), name: "gas_flow" },
    RegisterRow { id: HEAT_KW, address: 0x000C, size: 2, flags: RowFlags::REPORT, name: "heat_kw" },
    RegisterRow { id: HEAT_FLOW, address: 0x000E, size: 2, flags: RowFlags::REPORT, name: "heat_flow" },
    RegisterRow { id: HEAT_TEMPERATURE, address: 0x0010, size: 2, flags: RowFlags::REPORT, name: "heat_temperature" },
    RegisterRow { id: SERIAL_NUMBER, address: 0x0012, size: 2, flags: RowFlags::empty(), name: "serial_number" },
];

/// Input-register table for the water meter family.
pub static INPUT_REGISTERS: RegisterTable = RegisterTable::new(ROWS);
