//! Unit tests for the register/command tables.

use meterlink::table::{electric, water};
use proptest::prelude::*;

#[test]
fn water_rows_are_contiguous_two_register_quantities() {
    let table = &water::INPUT_REGISTERS;
    let mut expected_address = 0u16;
    for row in table.span_rows(0, table.len() as u16 - 1) {
        assert_eq!(row.address, expected_address);
        expected_address += row.size;
    }
}

#[test]
fn span_size_of_full_water_table() {
    let table = &water::INPUT_REGISTERS;
    assert_eq!(table.span_size(0, table.len() as u16 - 1), 20);
}

#[test]
fn electric_table_has_reportable_and_silent_rows() {
    let table = &electric::COMMANDS;
    let rows = table.span_rows(0, table.len() as u16 - 1);
    assert!(rows.iter().any(|r| r.is_reportable()));
    assert!(rows.iter().any(|r| !r.is_reportable()));
}

#[test]
fn out_of_table_ranges_are_rejected() {
    let table = &water::INPUT_REGISTERS;
    let sentinel = table.len() as u16;
    assert!(!table.contains_range(0, sentinel));
    assert!(!table.contains_range(3, 2));
    assert!(table.contains_range(0, sentinel - 1));
}

proptest! {
    /// The group size of any valid range is the sum of the member sizes.
    #[test]
    fn span_size_is_sum_of_member_sizes(start in 0u16..8, extra in 0u16..8) {
        let table = &electric::COMMANDS;
        let last = table.len() as u16 - 1;
        let start = start.min(last);
        let stop = (start + extra).min(last);

        let by_hand: u16 = (start..=stop)
            .map(|id| table.get(id).unwrap().size)
            .sum();
        prop_assert_eq!(table.span_size(start, stop), by_hand);
    }
}
