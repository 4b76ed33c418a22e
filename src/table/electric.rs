//! Electric meter command table.
//!
//! Each row is one command word on the delimited bus; sizes are the number
//! of payload bytes the meter returns for that command. Payload bytes arrive
//! offset by the wire mask and are restored by the decoder, which also
//! applies the per-command display formatting.

use super::{RegisterRow, RegisterTable, RowFlags};

pub const DATE: u16 = 0;
pub const TIME: u16 = 1;
pub const ENERGY_ACTIVE: u16 = 2;
pub const RUN_MODE: u16 = 3;
pub const VERSION: u16 = 4;
pub const METER_CONSTANT: u16 = 5;
pub const BATTERY_TIME: u16 = 6;
pub const RESERVED: u16 = 7;

const ROWS: &[RegisterRow] = &[
    RegisterRow { id: DATE, address: 0xC010, size: 4, flags: RowFlags::REPORT, name: "date" },
    RegisterRow { id: TIME, address: 0xC011, size: 3, flags: RowFlags::REPORT, name: "time" },
    RegisterRow { id: ENERGY_ACTIVE, address: 0x9010, size: 20, flags: RowFlags::REPORT, name: "energy_active" },
    RegisterRow { id: RUN_MODE, address: 0xC032, size: 1, flags: RowFlags::REPORT, name: "run_mode" },
    RegisterRow { id: VERSION, address: 0xC030, size: 3, flags: RowFlags::REPORT, name: "version" },
    RegisterRow { id: METER_CONSTANT, address: 0xC019, size: 2, flags: RowFlags::REPORT, name: "meter_constant" },
    RegisterRow { id: BATTERY_TIME, address: 0xC01A, size: 3, flags: RowFlags::empty(), name: "battery_time" },
    RegisterRow { id: RESERVED, address: 0xC01F, size: 2, flags: RowFlags::REPORT, name: "reserved" },
];

/// Command table for the electric meter family.
pub static COMMANDS: RegisterTable = RegisterTable::new(ROWS);
