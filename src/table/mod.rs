//! # Register Tables
//!
//! Static, compile-time metadata describing every addressable quantity on
//! each meter family. One row per register group or device command; rows are
//! ordered by id, ids are contiguous from zero, and the table length is the
//! sentinel count. A contiguous id range forms one logical read group whose
//! total size is the sum of the member sizes.
//!
//! Row sizes are family-dependent: 16-bit registers for the water (register
//! frame) family, payload bytes for the electric (delimited frame) family.

pub mod electric;
pub mod water;

use bitflags::bitflags;

bitflags! {
    /// Per-row behavior flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RowFlags: u8 {
        /// Row is included in decoded/exported output.
        const REPORT = 0x01;
    }
}

/// One addressable quantity or device command.
#[derive(Debug, Clone, Copy)]
pub struct RegisterRow {
    /// Stable row id, equal to the row's index in its table.
    pub id: u16,
    /// Register or command address on the wire.
    pub address: u16,
    /// Row size: registers for the water family, bytes for electric.
    pub size: u16,
    pub flags: RowFlags,
    pub name: &'static str,
}

impl RegisterRow {
    pub fn is_reportable(&self) -> bool {
        self.flags.contains(RowFlags::REPORT)
    }
}

/// An ordered, immutable table of rows for one meter family.
#[derive(Debug)]
pub struct RegisterTable {
    rows: &'static [RegisterRow],
}

impl RegisterTable {
    pub const fn new(rows: &'static [RegisterRow]) -> Self {
        RegisterTable { rows }
    }

    /// Number of rows; also the sentinel id one past the last valid row.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: u16) -> Option<&RegisterRow> {
        self.rows.get(id as usize)
    }

    /// All rows in the inclusive id range `start..=stop`.
    ///
    /// Callers must pass a valid range (`start <= stop < len`); out-of-table
    /// ranges are rejected at configuration time.
    pub fn span_rows(&self, start: u16, stop: u16) -> &[RegisterRow] {
        &self.rows[start as usize..=stop as usize]
    }

    /// Total size of the read group `start..=stop`: the sum of the member
    /// row sizes, in the family's size unit.
    pub fn span_size(&self, start: u16, stop: u16) -> u16 {
        self.span_rows(start, stop).iter().map(|r| r.size).sum()
    }

    /// Checks that `start..=stop` addresses existing rows in order.
    pub fn contains_range(&self, start: u16, stop: u16) -> bool {
        start <= stop && (stop as usize) < self.rows.len()
    }
}
